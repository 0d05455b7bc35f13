//! Depth-first traversal engine.
//!
//! Walks every node exactly once in the grammar's child order, calling the
//! visitor's `enter_*` hook before a node's children and its `leave_*` hook
//! after all of them, so a `leave` hook always sees fully processed children.
//! A `leave` hook on a replaceable family may return a substitute node; the
//! engine splices it into the parent slot and does not re-traverse it.

use crate::ast::{
    BlockStmt, ClassBody, Expr, ExprKind, MethodDef, Pat, PatKind, Program, Property, Stmt,
    StmtKind, VarDeclarator,
};
use crate::error::Result;

/// Visitor hooks, all defaulting to no-ops. A pass implements either the
/// rewrite role (returning replacements) or the code-generation role
/// (populating text slots), never both.
#[allow(unused_variables)]
pub trait Visitor {
    fn name(&self) -> &'static str;

    fn enter_program(&mut self, node: &mut Program) {}
    fn leave_program(&mut self, node: &mut Program) -> Result<()> {
        Ok(())
    }

    fn enter_stmt(&mut self, node: &mut Stmt) {}
    fn leave_stmt(&mut self, node: &mut Stmt) -> Result<Option<Stmt>> {
        Ok(None)
    }

    fn enter_expr(&mut self, node: &mut Expr) {}
    fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
        Ok(None)
    }

    fn enter_pat(&mut self, node: &mut Pat) {}
    fn leave_pat(&mut self, node: &mut Pat) -> Result<Option<Pat>> {
        Ok(None)
    }

    fn enter_block(&mut self, node: &mut BlockStmt) {}
    fn leave_block(&mut self, node: &mut BlockStmt) -> Result<()> {
        Ok(())
    }

    fn enter_class_body(&mut self, node: &mut ClassBody) {}
    fn leave_class_body(&mut self, node: &mut ClassBody) -> Result<()> {
        Ok(())
    }

    fn enter_method(&mut self, node: &mut MethodDef) {}
    fn leave_method(&mut self, node: &mut MethodDef) -> Result<()> {
        Ok(())
    }

    fn enter_property(&mut self, node: &mut Property) {}
    fn leave_property(&mut self, node: &mut Property) -> Result<()> {
        Ok(())
    }

    fn enter_declarator(&mut self, node: &mut VarDeclarator) {}
    fn leave_declarator(&mut self, node: &mut VarDeclarator) -> Result<()> {
        Ok(())
    }
}

/// Walk a whole program. One pass runs to completion before the next begins;
/// nothing here suspends or blocks.
pub fn traverse(program: &mut Program, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_program(program);
    for stmt in &mut program.body {
        visit_stmt(stmt, visitor)?;
    }
    visitor.leave_program(program)
}

/// Walk a bare expression subtree with the same engine.
pub fn traverse_expr(expr: &mut Expr, visitor: &mut dyn Visitor) -> Result<()> {
    visit_expr(expr, visitor)
}

fn visit_stmt(stmt: &mut Stmt, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_stmt(stmt);
    match &mut stmt.kind {
        StmtKind::Expr(expr) => visit_expr(expr, visitor)?,
        StmtKind::Block(block) => visit_block(block, visitor)?,
        StmtKind::VarDecl(decl) => {
            for declarator in &mut decl.declarations {
                visit_declarator(declarator, visitor)?;
            }
        }
        StmtKind::Func(func) => {
            for param in &mut func.params {
                visit_pat(param, visitor)?;
            }
            visit_block(&mut func.body, visitor)?;
        }
        StmtKind::Class(class) => {
            if let Some(super_class) = &mut class.super_class {
                visit_expr(super_class, visitor)?;
            }
            visit_class_body(&mut class.body, visitor)?;
        }
        StmtKind::Return(ret) => {
            if let Some(argument) = &mut ret.argument {
                visit_expr(argument, visitor)?;
            }
        }
        StmtKind::If(stmt_if) => {
            visit_expr(&mut stmt_if.test, visitor)?;
            visit_stmt(&mut stmt_if.consequent, visitor)?;
            if let Some(alternate) = &mut stmt_if.alternate {
                visit_stmt(alternate, visitor)?;
            }
        }
        StmtKind::For(stmt_for) => {
            if let Some(init) = &mut stmt_for.init {
                visit_stmt(init, visitor)?;
            }
            if let Some(test) = &mut stmt_for.test {
                visit_expr(test, visitor)?;
            }
            if let Some(update) = &mut stmt_for.update {
                visit_expr(update, visitor)?;
            }
            visit_stmt(&mut stmt_for.body, visitor)?;
        }
    }
    if let Some(replacement) = visitor.leave_stmt(stmt)? {
        *stmt = replacement;
    }
    Ok(())
}

fn visit_expr(expr: &mut Expr, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_expr(expr);
    match &mut expr.kind {
        ExprKind::Ident(_)
        | ExprKind::Lit(_)
        | ExprKind::This(_)
        | ExprKind::Super(_)
        | ExprKind::Wildcard(_) => {}
        ExprKind::Array(array) => {
            for element in &mut array.elements {
                visit_expr(element, visitor)?;
            }
        }
        ExprKind::Object(object) => {
            for property in &mut object.properties {
                visit_property(property, visitor)?;
            }
        }
        ExprKind::Template(template) => {
            for expression in &mut template.expressions {
                visit_expr(expression, visitor)?;
            }
        }
        ExprKind::Unary(unary) => visit_expr(&mut unary.argument, visitor)?,
        ExprKind::Update(update) => visit_expr(&mut update.argument, visitor)?,
        ExprKind::Binary(binary) => {
            visit_expr(&mut binary.left, visitor)?;
            visit_expr(&mut binary.right, visitor)?;
        }
        ExprKind::Assign(assign) => {
            visit_expr(&mut assign.left, visitor)?;
            visit_expr(&mut assign.right, visitor)?;
        }
        ExprKind::Member(member) => {
            visit_expr(&mut member.object, visitor)?;
            visit_expr(&mut member.property, visitor)?;
        }
        ExprKind::Call(call) => {
            visit_expr(&mut call.callee, visitor)?;
            for argument in &mut call.arguments {
                visit_expr(argument, visitor)?;
            }
        }
        ExprKind::New(ctor) => {
            visit_expr(&mut ctor.callee, visitor)?;
            for argument in &mut ctor.arguments {
                visit_expr(argument, visitor)?;
            }
        }
    }
    if let Some(replacement) = visitor.leave_expr(expr)? {
        *expr = replacement;
    }
    Ok(())
}

fn visit_pat(pat: &mut Pat, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_pat(pat);
    match &mut pat.kind {
        PatKind::Ident(_) => {}
        PatKind::Array(array) => {
            for element in &mut array.elements {
                visit_pat(element, visitor)?;
            }
        }
        PatKind::Assign(assign) => {
            visit_pat(&mut assign.left, visitor)?;
            visit_expr(&mut assign.right, visitor)?;
        }
    }
    if let Some(replacement) = visitor.leave_pat(pat)? {
        *pat = replacement;
    }
    Ok(())
}

fn visit_block(block: &mut BlockStmt, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_block(block);
    for stmt in &mut block.body {
        visit_stmt(stmt, visitor)?;
    }
    visitor.leave_block(block)
}

fn visit_class_body(body: &mut ClassBody, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_class_body(body);
    for method in &mut body.body {
        visit_method(method, visitor)?;
    }
    visitor.leave_class_body(body)
}

fn visit_method(method: &mut MethodDef, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_method(method);
    visit_expr(&mut method.key, visitor)?;
    for param in &mut method.params {
        visit_pat(param, visitor)?;
    }
    visit_block(&mut method.body, visitor)?;
    visitor.leave_method(method)
}

fn visit_property(property: &mut Property, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_property(property);
    visit_expr(&mut property.key, visitor)?;
    visit_expr(&mut property.value, visitor)?;
    visitor.leave_property(property)
}

fn visit_declarator(declarator: &mut VarDeclarator, visitor: &mut dyn Visitor) -> Result<()> {
    visitor.enter_declarator(declarator);
    visit_pat(&mut declarator.id, visitor)?;
    if let Some(init) = &mut declarator.init {
        visit_expr(init, visitor)?;
    }
    visitor.leave_declarator(declarator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinExpr, IfStmt, Lit, ReturnStmt};

    fn binary(op: &str, left: Expr, right: Expr) -> Expr {
        ExprKind::Binary(BinExpr {
            op: op.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
        .into()
    }

    /// Records the order of expression enters and leaves by identifier name.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn enter_expr(&mut self, node: &mut Expr) {
            if let Some(ident) = node.as_ident() {
                self.events.push(format!("enter {}", ident.name));
            }
        }

        fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
            if let Some(ident) = node.as_ident() {
                self.events.push(format!("leave {}", ident.name));
            }
            Ok(None)
        }
    }

    #[test]
    fn children_visit_in_grammar_order() -> Result<()> {
        // if (t) { return c; } else { return a; }
        let stmt = StmtKind::If(IfStmt {
            test: Expr::ident("t"),
            consequent: Box::new(
                StmtKind::Block(BlockStmt::new(vec![StmtKind::Return(ReturnStmt {
                    argument: Some(Expr::ident("c")),
                })
                .into()]))
                .into(),
            ),
            alternate: Some(Box::new(
                StmtKind::Block(BlockStmt::new(vec![StmtKind::Return(ReturnStmt {
                    argument: Some(Expr::ident("a")),
                })
                .into()]))
                .into(),
            )),
        });
        let mut program = Program::new(vec![stmt.into()]);
        let mut recorder = Recorder::default();
        traverse(&mut program, &mut recorder)?;
        assert_eq!(
            recorder.events,
            vec!["enter t", "leave t", "enter c", "leave c", "enter a", "leave a"]
        );
        Ok(())
    }

    /// Replaces every identifier `a` and counts how many nodes it saw, to
    /// prove replacements are spliced without being re-traversed.
    struct Replacer {
        visited: usize,
    }

    impl Visitor for Replacer {
        fn name(&self) -> &'static str {
            "replacer"
        }

        fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
            self.visited += 1;
            if node.as_ident().is_some_and(|ident| ident.name == "a") {
                return Ok(Some(binary(
                    "+",
                    Expr::ident("x"),
                    Expr::ident("y"),
                )));
            }
            Ok(None)
        }
    }

    #[test]
    fn replacement_splices_without_retraversal() -> Result<()> {
        // a + b: replacing `a` must not visit the substitute's children,
        // and `b` must still be visited afterwards.
        let mut program = Program::new(vec![Stmt::expr(binary(
            "+",
            Expr::ident("a"),
            Expr::ident("b"),
        ))]);
        let mut replacer = Replacer { visited: 0 };
        traverse(&mut program, &mut replacer)?;
        // a, b, and the root binary; x and y are never entered.
        assert_eq!(replacer.visited, 3);

        let StmtKind::Expr(root) = &program.body[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary(root_bin) = &root.kind else {
            panic!("expected binary root");
        };
        let ExprKind::Binary(left) = &root_bin.left.kind else {
            panic!("expected spliced binary on the left");
        };
        assert_eq!(left.left.as_ident().unwrap().name, "x");
        assert_eq!(root_bin.right.as_ident().unwrap().name, "b");
        Ok(())
    }

    /// Synthesizes text bottom-up to prove children are final before `leave`.
    struct Speller;

    impl Visitor for Speller {
        fn name(&self) -> &'static str {
            "speller"
        }

        fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
            let text = match &node.kind {
                ExprKind::Ident(ident) => ident.name.clone(),
                ExprKind::Lit(lit) => lit.raw.clone(),
                ExprKind::Binary(bin) => format!("({} {} {})", bin.left.text(), bin.op, bin.right.text()),
                _ => String::new(),
            };
            node.set_text(text);
            Ok(None)
        }
    }

    #[test]
    fn leave_sees_synthesized_children() -> Result<()> {
        let expr = binary(
            "*",
            binary("+", Expr::ident("a"), Expr::lit(Lit::number(1.0, "1"))),
            Expr::ident("b"),
        );
        let mut program = Program::new(vec![Stmt::expr(expr)]);
        traverse(&mut program, &mut Speller)?;
        let StmtKind::Expr(root) = &program.body[0].kind else {
            panic!("expected expression statement");
        };
        assert_eq!(root.text(), "((a + 1) * b)");
        Ok(())
    }
}
