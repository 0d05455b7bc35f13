//! The code-generation visitor: one rendering rule per node kind, applied on
//! `leave` so every rule is a pure function of its children's already
//! synthesized text plus the indentation stack.
//!
//! Statement text carries no leading indentation on its first line; the
//! enclosing block prefixes it when joining. Continuation lines inside a
//! statement carry their full absolute indentation.

use itertools::Itertools;
use js2py_core::ast::{
    BinExpr, BlockStmt, ClassBody, Expr, ExprKind, ForStmt, Ident, IfStmt, Lit, LitValue,
    MemberExpr, MethodDef, MethodKind, ObjectLit, Pat, PatKind, Program, Property, Stmt, StmtKind,
    TemplateLit, VarDeclarator,
};
use js2py_core::error::Result;
use js2py_core::visit::Visitor;
use js2py_core::warn;

use crate::indent::Indent;

/// Sentinel spelled into the output for operators with no defined target
/// mapping. Conversion still completes; the output is flagged as partial.
pub const UNTRANSLATABLE: &str = "??";

pub struct PythonGenerator {
    indent: Indent,
}

impl PythonGenerator {
    pub fn new() -> Self {
        Self {
            indent: Indent::new(),
        }
    }

    fn render_object(&mut self, object: &ObjectLit) -> String {
        if object.properties.is_empty() {
            self.indent.pop();
            return "{}".to_string();
        }
        let inner = self.indent.current();
        let properties = object
            .properties
            .iter()
            .map(Property::text)
            .join(&format!(",\n{inner}"));
        self.indent.pop();
        format!(
            "{{\n{inner}{properties}\n{close}}}",
            close = self.indent.current()
        )
    }

    /// Body rendering for headers like `if`/`while`/`for`. Blocks already
    /// carry their indentation; a single bare statement gets indented here.
    fn body_text(&self, stmt: &Stmt) -> String {
        match &stmt.kind {
            StmtKind::Block(_) => stmt.text().to_string(),
            _ => format!("{}{}", self.indent.deeper(), stmt.text()),
        }
    }

    fn render_if(&self, stmt_if: &IfStmt) -> String {
        let mut text = format!(
            "if {}:\n{}",
            stmt_if.test.text(),
            self.body_text(&stmt_if.consequent)
        );
        if let Some(alternate) = &stmt_if.alternate {
            text.push_str(&format!(
                "\n{}else:\n{}",
                self.indent.current(),
                self.body_text(alternate)
            ));
        }
        text
    }

    fn render_for(&self, stmt_for: &ForStmt) -> String {
        if let Some(range) = as_range_loop(stmt_for) {
            return format!(
                "for {} in range({}, {}):\n{}",
                range.var,
                range.low,
                range.high,
                self.body_text(&stmt_for.body)
            );
        }

        // Fallback shape: initializer, `while` header, original body, update
        // re-injected at the body's own depth.
        let mut text = String::new();
        if let Some(init) = &stmt_for.init {
            text.push_str(init.text());
            text.push('\n');
            text.push_str(&self.indent.current());
        }
        let test = stmt_for
            .test
            .as_ref()
            .map(Expr::text)
            .unwrap_or("True");
        text.push_str(&format!(
            "while {}:\n{}",
            test,
            self.body_text(&stmt_for.body)
        ));
        if let Some(update) = &stmt_for.update {
            text.push_str(&format!("\n{}{}", self.indent.deeper(), update.text()));
        }
        text
    }
}

impl Default for PythonGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for PythonGenerator {
    fn name(&self) -> &'static str {
        "python-codegen"
    }

    fn enter_expr(&mut self, node: &mut Expr) {
        if matches!(node.kind, ExprKind::Object(_)) {
            self.indent.push();
        }
    }

    fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
        let text = match &node.kind {
            ExprKind::Ident(ident) => ident.name.clone(),
            ExprKind::Lit(lit) => render_lit(lit),
            ExprKind::This(_) => "self".to_string(),
            ExprKind::Super(_) => "super()".to_string(),
            ExprKind::Array(array) => {
                format!("[{}]", array.elements.iter().map(Expr::text).join(", "))
            }
            ExprKind::Object(object) => self.render_object(object),
            ExprKind::Template(template) => render_template(template),
            ExprKind::Unary(unary) => {
                let op = unary_target_op(&unary.op);
                if op == UNTRANSLATABLE {
                    warn!(operator = unary.op.as_str(), "operator has no target equivalent");
                }
                format!("{}{}", op, unary.argument.text())
            }
            ExprKind::Update(update) => {
                let sign = if update.op == "++" { "+" } else { "-" };
                format!("{} {}= 1", update.argument.text(), sign)
            }
            ExprKind::Binary(binary) => render_binary(binary),
            ExprKind::Assign(assign) => format!(
                "{} {} {}",
                assign.left.text(),
                assign.op,
                assign.right.text()
            ),
            ExprKind::Member(member) => render_member(member),
            ExprKind::Call(call) => {
                let suffix = if matches!(call.callee.kind, ExprKind::Super(_)) {
                    ".__init__"
                } else {
                    ""
                };
                format!(
                    "{}{}({})",
                    call.callee.text(),
                    suffix,
                    call.arguments.iter().map(Expr::text).join(", ")
                )
            }
            ExprKind::New(ctor) => format!(
                "{}({})",
                ctor.callee.text(),
                ctor.arguments.iter().map(Expr::text).join(", ")
            ),
            ExprKind::Wildcard(index) => {
                warn!(index = *index, "wildcard leaked into code generation");
                format!("_{index}")
            }
        };
        node.set_text(text);
        Ok(None)
    }

    fn leave_pat(&mut self, node: &mut Pat) -> Result<Option<Pat>> {
        let text = match &node.kind {
            PatKind::Ident(ident) => ident.name.clone(),
            PatKind::Array(array) => {
                format!("[{}]", array.elements.iter().map(Pat::text).join(", "))
            }
            PatKind::Assign(assign) => {
                format!("{} = {}", assign.left.text(), assign.right.text())
            }
        };
        node.set_text(text);
        Ok(None)
    }

    fn enter_block(&mut self, _node: &mut BlockStmt) {
        self.indent.push();
    }

    fn leave_block(&mut self, node: &mut BlockStmt) -> Result<()> {
        let inner = self.indent.current();
        let text = if node.body.is_empty() {
            format!("{inner}pass")
        } else {
            format!(
                "{inner}{}",
                node.body.iter().map(Stmt::text).join(&format!("\n{inner}"))
            )
        };
        node.text = Some(text);
        self.indent.pop();
        Ok(())
    }

    fn enter_class_body(&mut self, _node: &mut ClassBody) {
        self.indent.push();
    }

    fn leave_class_body(&mut self, node: &mut ClassBody) -> Result<()> {
        let inner = self.indent.current();
        let text = if node.body.is_empty() {
            format!("{inner}pass\n")
        } else {
            format!(
                "{inner}{}\n",
                node.body
                    .iter()
                    .map(MethodDef::text)
                    .join(&format!("\n{inner}"))
            )
        };
        node.text = Some(text);
        self.indent.pop();
        Ok(())
    }

    fn leave_method(&mut self, node: &mut MethodDef) -> Result<()> {
        let method_name = match node.kind {
            MethodKind::Constructor => "__init__".to_string(),
            MethodKind::Method => node.key.text().to_string(),
        };
        let params = std::iter::once("self")
            .chain(node.params.iter().map(Pat::text))
            .join(", ");
        node.text = Some(format!(
            "def {}({}):\n{}\n",
            method_name,
            params,
            node.body.text()
        ));
        Ok(())
    }

    fn leave_property(&mut self, node: &mut Property) -> Result<()> {
        node.text = Some(format!("'{}': {}", node.key.text(), node.value.text()));
        Ok(())
    }

    fn leave_declarator(&mut self, node: &mut VarDeclarator) -> Result<()> {
        node.text = Some(match &node.init {
            Some(init) => format!("{} = {}", node.id.text(), init.text()),
            None => String::new(),
        });
        Ok(())
    }

    fn leave_stmt(&mut self, node: &mut Stmt) -> Result<Option<Stmt>> {
        let text = match &node.kind {
            StmtKind::Expr(expr) => expr.text().to_string(),
            StmtKind::Block(block) => block.text().to_string(),
            StmtKind::Return(ret) => match &ret.argument {
                Some(argument) => format!("return {}", argument.text()),
                None => "return".to_string(),
            },
            StmtKind::VarDecl(decl) => decl
                .declarations
                .iter()
                .map(VarDeclarator::text)
                .join(&format!("\n{}", self.indent.current())),
            StmtKind::Func(func) => {
                let name = func.id.as_ref().map(Ident::as_str).unwrap_or_default();
                format!(
                    "def {}({}):\n{}\n",
                    name,
                    func.params.iter().map(Pat::text).join(", "),
                    func.body.text()
                )
            }
            StmtKind::Class(class) => {
                let super_class = class
                    .super_class
                    .as_ref()
                    .map(|super_class| format!("({})", super_class.text()))
                    .unwrap_or_default();
                format!("class {}{}:\n{}", class.id.name, super_class, class.body.text())
            }
            StmtKind::If(stmt_if) => self.render_if(stmt_if),
            StmtKind::For(stmt_for) => self.render_for(stmt_for),
        };
        node.set_text(text);
        Ok(None)
    }

    fn leave_program(&mut self, node: &mut Program) -> Result<()> {
        node.text = Some(node.body.iter().map(Stmt::text).join("\n"));
        Ok(())
    }
}

fn render_lit(lit: &Lit) -> String {
    match lit.value {
        LitValue::Null => "None".to_string(),
        _ => lit.raw.clone(),
    }
}

fn render_binary(binary: &BinExpr) -> String {
    let left = if binary.left.is_binary() {
        format!("({})", binary.left.text())
    } else {
        binary.left.text().to_string()
    };
    let right = if binary.right.is_binary() {
        format!("({})", binary.right.text())
    } else {
        binary.right.text().to_string()
    };
    let op = if binary.op == "===" {
        "=="
    } else {
        binary.op.as_str()
    };
    format!("{left} {op} {right}")
}

fn render_member(member: &MemberExpr) -> String {
    let numeric_key = matches!(
        &member.property.kind,
        ExprKind::Lit(Lit {
            value: LitValue::Num(_),
            ..
        })
    );
    if numeric_key {
        format!("{}[{}]", member.object.text(), member.property.text())
    } else {
        format!("{}.{}", member.object.text(), member.property.text())
    }
}

fn render_template(template: &TemplateLit) -> String {
    let format_string = format!("'{}'", template.quasis.iter().join("%f"));
    if template.expressions.is_empty() {
        format_string
    } else {
        format!(
            "{} % ({})",
            format_string,
            template.expressions.iter().map(Expr::text).join(", ")
        )
    }
}

fn unary_target_op(op: &str) -> &'static str {
    match op {
        "delete" => "del ",
        "!" => "not ",
        "+" => "+",
        "-" => "-",
        _ => UNTRANSLATABLE,
    }
}

struct RangeLoop<'a> {
    var: &'a str,
    low: &'a str,
    high: &'a str,
}

/// Recognize the counting shape: a single-declarator initializer, an
/// increment-by-one update, and a binary comparison bound.
fn as_range_loop(stmt_for: &ForStmt) -> Option<RangeLoop<'_>> {
    let init = stmt_for.init.as_deref()?;
    let StmtKind::VarDecl(decl) = &init.kind else {
        return None;
    };
    if decl.declarations.len() != 1 {
        return None;
    }
    let declarator = &decl.declarations[0];
    let var = declarator.id.as_ident()?.name.as_str();
    let low = declarator.init.as_ref()?.text();

    let update = stmt_for.update.as_ref()?;
    let unit_step = match &update.kind {
        ExprKind::Update(update) => update.op == "++",
        ExprKind::Assign(assign) => {
            assign.op == "+="
                && matches!(
                    &assign.right.kind,
                    ExprKind::Lit(Lit { value: LitValue::Num(step), .. }) if *step == 1.0
                )
        }
        _ => false,
    };
    if !unit_step {
        return None;
    }

    let test = stmt_for.test.as_ref()?;
    let ExprKind::Binary(binary) = &test.kind else {
        return None;
    };
    Some(RangeLoop {
        var,
        low,
        high: binary.right.text(),
    })
}
