use itertools::Itertools;
use js2py_core::ast::{
    ArrayLit, ArrayPat, AssignExpr, AssignPat, BinExpr, BlockStmt, CallExpr, ClassBody, ClassDecl,
    DeclKind, Expr, ExprKind, ForStmt, FunctionDecl, Ident, IfStmt, Lit, LitValue, MemberExpr,
    MethodDef, MethodKind, NewExpr, ObjectLit, Pat, PatKind, Program, Property, ReturnStmt, Stmt,
    StmtKind, SuperExpr, TemplateLit, ThisExpr, UnaryExpr, UpdateExpr, VarDecl, VarDeclarator,
};
use js2py_core::error::{Error, Result};
use js2py_core::frontend::SourceFrontend;
use swc_common::input::StringInput;
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast as js;
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::error::Error as SwcError;
use swc_ecma_parser::lexer::Lexer;
use swc_ecma_parser::{EsConfig, Parser, Syntax};

const LANGUAGE_KEY: &str = "javascript";

pub struct JavaScriptFrontend;

impl JavaScriptFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFrontend for JavaScriptFrontend {
    fn language(&self) -> &'static str {
        LANGUAGE_KEY
    }

    fn parse(&self, source: &str) -> Result<Program> {
        parse_program(source)
    }
}

/// Parse an ES2015 script and lower it into the core AST. Any parse error
/// aborts the whole conversion; nothing is emitted on failure.
pub fn parse_program(source: &str) -> Result<Program> {
    let script = parse_script_internal(source)
        .map_err(|errors| Error::Parse(render_errors(&errors)))?;
    lower_script(&script)
}

fn parse_script_internal(source: &str) -> std::result::Result<js::Script, Vec<SwcError>> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom("<js2py>".into()), source.to_string());
    let lexer = Lexer::new(
        Syntax::Es(EsConfig {
            allow_return_outside_function: true,
            ..Default::default()
        }),
        EsVersion::Es2015,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let script = parser.parse_script();
    let mut errors = parser.take_errors();
    match script {
        Ok(script) if errors.is_empty() => Ok(script),
        Ok(_) => Err(errors),
        Err(fatal) => {
            errors.push(fatal);
            Err(errors)
        }
    }
}

fn render_errors(errors: &[SwcError]) -> String {
    errors.iter().map(|error| format!("{error:?}")).join("; ")
}

fn lower_script(script: &js::Script) -> Result<Program> {
    Ok(Program::new(lower_stmts(&script.body)?))
}

fn lower_stmts(stmts: &[js::Stmt]) -> Result<Vec<Stmt>> {
    stmts
        .iter()
        .filter(|stmt| !matches!(stmt, js::Stmt::Empty(_)))
        .map(lower_stmt)
        .collect()
}

fn lower_stmt(stmt: &js::Stmt) -> Result<Stmt> {
    let kind = match stmt {
        js::Stmt::Expr(expr_stmt) => StmtKind::Expr(lower_expr(&expr_stmt.expr)?),
        js::Stmt::Block(block) => StmtKind::Block(lower_block(block)?),
        js::Stmt::Decl(decl) => lower_decl(decl)?,
        js::Stmt::Return(ret) => StmtKind::Return(ReturnStmt {
            argument: ret.arg.as_deref().map(lower_expr).transpose()?,
        }),
        js::Stmt::If(stmt_if) => StmtKind::If(IfStmt {
            test: lower_expr(&stmt_if.test)?,
            consequent: Box::new(lower_stmt(&stmt_if.cons)?),
            alternate: stmt_if
                .alt
                .as_deref()
                .map(lower_stmt)
                .transpose()?
                .map(Box::new),
        }),
        js::Stmt::For(stmt_for) => StmtKind::For(ForStmt {
            init: stmt_for
                .init
                .as_ref()
                .map(lower_for_init)
                .transpose()?
                .map(Box::new),
            test: stmt_for.test.as_deref().map(lower_expr).transpose()?,
            update: stmt_for.update.as_deref().map(lower_expr).transpose()?,
            body: Box::new(lower_stmt(&stmt_for.body)?),
        }),
        other => {
            return Err(Error::Unsupported(stmt_name(other).to_string()));
        }
    };
    Ok(Stmt::new(kind))
}

fn stmt_name(stmt: &js::Stmt) -> &'static str {
    match stmt {
        js::Stmt::While(_) => "while statement",
        js::Stmt::DoWhile(_) => "do-while statement",
        js::Stmt::Switch(_) => "switch statement",
        js::Stmt::Throw(_) => "throw statement",
        js::Stmt::Try(_) => "try statement",
        js::Stmt::ForIn(_) => "for-in statement",
        js::Stmt::ForOf(_) => "for-of statement",
        js::Stmt::Labeled(_) => "labeled statement",
        js::Stmt::Break(_) => "break statement",
        js::Stmt::Continue(_) => "continue statement",
        js::Stmt::With(_) => "with statement",
        js::Stmt::Debugger(_) => "debugger statement",
        _ => "statement",
    }
}

fn lower_for_init(init: &js::VarDeclOrExpr) -> Result<Stmt> {
    let kind = match init {
        js::VarDeclOrExpr::VarDecl(decl) => StmtKind::VarDecl(lower_var_decl(decl)?),
        js::VarDeclOrExpr::Expr(expr) => StmtKind::Expr(lower_expr(expr)?),
    };
    Ok(Stmt::new(kind))
}

fn lower_decl(decl: &js::Decl) -> Result<StmtKind> {
    match decl {
        js::Decl::Var(var) => Ok(StmtKind::VarDecl(lower_var_decl(var)?)),
        js::Decl::Fn(fn_decl) => {
            let function = &fn_decl.function;
            if function.is_async || function.is_generator {
                return Err(Error::Unsupported("async or generator function".into()));
            }
            Ok(StmtKind::Func(FunctionDecl {
                id: Some(Ident::new(fn_decl.ident.sym.to_string())),
                params: lower_params(&function.params)?,
                body: function
                    .body
                    .as_ref()
                    .map(lower_block)
                    .transpose()?
                    .unwrap_or_else(BlockStmt::empty),
            }))
        }
        js::Decl::Class(class_decl) => Ok(StmtKind::Class(lower_class(class_decl)?)),
        _ => Err(Error::Unsupported("declaration".into())),
    }
}

fn lower_var_decl(var: &js::VarDecl) -> Result<VarDecl> {
    let declarations = var
        .decls
        .iter()
        .map(lower_declarator)
        .collect::<Result<Vec<_>>>()?;
    let kind = match var.kind {
        js::VarDeclKind::Var => DeclKind::Var,
        js::VarDeclKind::Let => DeclKind::Let,
        js::VarDeclKind::Const => DeclKind::Const,
    };
    Ok(VarDecl { kind, declarations })
}

fn lower_declarator(declarator: &js::VarDeclarator) -> Result<VarDeclarator> {
    Ok(VarDeclarator::new(
        lower_pat(&declarator.name)?,
        declarator.init.as_deref().map(lower_expr).transpose()?,
    ))
}

fn lower_params(params: &[js::Param]) -> Result<Vec<Pat>> {
    params.iter().map(|param| lower_pat(&param.pat)).collect()
}

fn lower_pat(pat: &js::Pat) -> Result<Pat> {
    let kind = match pat {
        js::Pat::Ident(binding) => PatKind::Ident(Ident::new(binding.id.sym.to_string())),
        js::Pat::Array(array) => PatKind::Array(ArrayPat {
            elements: array
                .elems
                .iter()
                .map(|element| match element {
                    Some(element) => lower_pat(element),
                    None => Err(Error::Unsupported("array pattern hole".into())),
                })
                .collect::<Result<Vec<_>>>()?,
        }),
        js::Pat::Assign(assign) => PatKind::Assign(AssignPat {
            left: Box::new(lower_pat(&assign.left)?),
            right: lower_expr(&assign.right)?,
        }),
        _ => return Err(Error::Unsupported("binding pattern".into())),
    };
    Ok(Pat::new(kind))
}

fn lower_class(class_decl: &js::ClassDecl) -> Result<ClassDecl> {
    let class = &class_decl.class;
    let mut methods = Vec::new();
    for member in &class.body {
        match member {
            js::ClassMember::Constructor(ctor) => methods.push(lower_constructor(ctor)?),
            js::ClassMember::Method(method) => methods.push(lower_method(method)?),
            js::ClassMember::Empty(_) => {}
            _ => return Err(Error::Unsupported("class member".into())),
        }
    }
    Ok(ClassDecl {
        id: Ident::new(class_decl.ident.sym.to_string()),
        super_class: class.super_class.as_deref().map(lower_expr).transpose()?,
        body: ClassBody::new(methods),
    })
}

fn lower_constructor(ctor: &js::Constructor) -> Result<MethodDef> {
    let params = ctor
        .params
        .iter()
        .map(|param| match param {
            js::ParamOrTsParamProp::Param(param) => lower_pat(&param.pat),
            js::ParamOrTsParamProp::TsParamProp(_) => {
                Err(Error::Unsupported("parameter property".into()))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(MethodDef {
        text: None,
        kind: MethodKind::Constructor,
        key: prop_name_expr(&ctor.key)?,
        params,
        body: ctor
            .body
            .as_ref()
            .map(lower_block)
            .transpose()?
            .unwrap_or_else(BlockStmt::empty),
    })
}

fn lower_method(method: &js::ClassMethod) -> Result<MethodDef> {
    if !matches!(method.kind, js::MethodKind::Method) {
        return Err(Error::Unsupported("accessor method".into()));
    }
    if method.is_static {
        return Err(Error::Unsupported("static method".into()));
    }
    Ok(MethodDef {
        text: None,
        kind: MethodKind::Method,
        key: prop_name_expr(&method.key)?,
        params: lower_params(&method.function.params)?,
        body: method
            .function
            .body
            .as_ref()
            .map(lower_block)
            .transpose()?
            .unwrap_or_else(BlockStmt::empty),
    })
}

fn prop_name_expr(key: &js::PropName) -> Result<Expr> {
    let kind = match key {
        js::PropName::Ident(ident) => ExprKind::Ident(Ident::new(ident.sym.to_string())),
        js::PropName::Str(string) => ExprKind::Lit(Lit::string(
            string.value.to_string(),
            raw_text(&string.raw, || format!("{:?}", string.value)),
        )),
        js::PropName::Num(number) => ExprKind::Lit(Lit::number(
            number.value,
            raw_text(&number.raw, || number.value.to_string()),
        )),
        _ => return Err(Error::Unsupported("computed property name".into())),
    };
    Ok(Expr::new(kind))
}

fn lower_block(block: &js::BlockStmt) -> Result<BlockStmt> {
    Ok(BlockStmt::new(lower_stmts(&block.stmts)?))
}

fn lower_expr(expr: &js::Expr) -> Result<Expr> {
    let kind = match expr {
        js::Expr::Ident(ident) => ExprKind::Ident(Ident::new(ident.sym.to_string())),
        js::Expr::This(_) => ExprKind::This(ThisExpr {}),
        js::Expr::Lit(lit) => ExprKind::Lit(lower_lit(lit)?),
        js::Expr::Array(array) => ExprKind::Array(ArrayLit {
            elements: array
                .elems
                .iter()
                .map(|element| match element {
                    Some(element) => lower_arg(element),
                    None => Err(Error::Unsupported("array hole".into())),
                })
                .collect::<Result<Vec<_>>>()?,
        }),
        js::Expr::Object(object) => ExprKind::Object(lower_object(object)?),
        js::Expr::Tpl(tpl) => ExprKind::Template(TemplateLit {
            quasis: tpl.quasis.iter().map(|quasi| quasi.raw.to_string()).collect(),
            expressions: tpl
                .exprs
                .iter()
                .map(|expression| lower_expr(expression))
                .collect::<Result<Vec<_>>>()?,
        }),
        js::Expr::Unary(unary) => ExprKind::Unary(UnaryExpr {
            op: unary_op_str(unary.op).to_string(),
            argument: Box::new(lower_expr(&unary.arg)?),
        }),
        js::Expr::Update(update) => ExprKind::Update(UpdateExpr {
            op: update_op_str(update.op).to_string(),
            prefix: update.prefix,
            argument: Box::new(lower_expr(&update.arg)?),
        }),
        js::Expr::Bin(bin) => ExprKind::Binary(BinExpr {
            op: binary_op_str(bin.op).to_string(),
            left: Box::new(lower_expr(&bin.left)?),
            right: Box::new(lower_expr(&bin.right)?),
        }),
        js::Expr::Assign(assign) => ExprKind::Assign(AssignExpr {
            op: assign_op_str(assign.op).to_string(),
            left: Box::new(lower_assign_target(&assign.left)?),
            right: Box::new(lower_expr(&assign.right)?),
        }),
        js::Expr::Member(member) => ExprKind::Member(lower_member(member)?),
        js::Expr::SuperProp(super_prop) => ExprKind::Member(MemberExpr {
            object: Box::new(Expr::new(ExprKind::Super(SuperExpr {}))),
            property: Box::new(match &super_prop.prop {
                js::SuperProp::Ident(ident) => Expr::ident(ident.sym.to_string()),
                js::SuperProp::Computed(computed) => lower_expr(&computed.expr)?,
            }),
        }),
        js::Expr::Call(call) => ExprKind::Call(CallExpr {
            callee: Box::new(lower_callee(&call.callee)?),
            arguments: lower_args(&call.args)?,
        }),
        js::Expr::New(ctor) => ExprKind::New(NewExpr {
            callee: Box::new(lower_expr(&ctor.callee)?),
            arguments: ctor
                .args
                .as_ref()
                .map(|args| lower_args(args))
                .transpose()?
                .unwrap_or_default(),
        }),
        js::Expr::Paren(paren) => return lower_expr(&paren.expr),
        other => {
            return Err(Error::Unsupported(expr_name(other).to_string()));
        }
    };
    Ok(Expr::new(kind))
}

fn expr_name(expr: &js::Expr) -> &'static str {
    match expr {
        js::Expr::Fn(_) => "function expression",
        js::Expr::Arrow(_) => "arrow function",
        js::Expr::Cond(_) => "conditional expression",
        js::Expr::Seq(_) => "sequence expression",
        js::Expr::Yield(_) => "yield expression",
        js::Expr::Await(_) => "await expression",
        js::Expr::TaggedTpl(_) => "tagged template",
        js::Expr::Class(_) => "class expression",
        _ => "expression",
    }
}

fn lower_object(object: &js::ObjectLit) -> Result<ObjectLit> {
    let mut properties = Vec::new();
    for prop in &object.props {
        let js::PropOrSpread::Prop(prop) = prop else {
            return Err(Error::Unsupported("spread property".into()));
        };
        match prop.as_ref() {
            js::Prop::KeyValue(key_value) => properties.push(Property::new(
                prop_name_expr(&key_value.key)?,
                lower_expr(&key_value.value)?,
            )),
            js::Prop::Shorthand(ident) => {
                let name = ident.sym.to_string();
                properties.push(Property::new(Expr::ident(name.clone()), Expr::ident(name)));
            }
            _ => return Err(Error::Unsupported("object property".into())),
        }
    }
    Ok(ObjectLit { properties })
}

fn lower_member(member: &js::MemberExpr) -> Result<MemberExpr> {
    let property = match &member.prop {
        js::MemberProp::Ident(ident) => Expr::ident(ident.sym.to_string()),
        js::MemberProp::Computed(computed) => lower_expr(&computed.expr)?,
        js::MemberProp::PrivateName(_) => {
            return Err(Error::Unsupported("private member".into()));
        }
    };
    Ok(MemberExpr {
        object: Box::new(lower_expr(&member.obj)?),
        property: Box::new(property),
    })
}

fn lower_callee(callee: &js::Callee) -> Result<Expr> {
    match callee {
        js::Callee::Expr(expr) => lower_expr(expr),
        js::Callee::Super(_) => Ok(Expr::new(ExprKind::Super(SuperExpr {}))),
        js::Callee::Import(_) => Err(Error::Unsupported("dynamic import".into())),
    }
}

fn lower_args(args: &[js::ExprOrSpread]) -> Result<Vec<Expr>> {
    args.iter().map(lower_arg).collect()
}

fn lower_arg(arg: &js::ExprOrSpread) -> Result<Expr> {
    if arg.spread.is_some() {
        return Err(Error::Unsupported("spread argument".into()));
    }
    lower_expr(&arg.expr)
}

fn lower_assign_target(target: &js::PatOrExpr) -> Result<Expr> {
    match target {
        js::PatOrExpr::Expr(expr) => lower_expr(expr),
        js::PatOrExpr::Pat(pat) => match pat.as_ref() {
            js::Pat::Ident(binding) => Ok(Expr::ident(binding.id.sym.to_string())),
            js::Pat::Expr(expr) => lower_expr(expr),
            // `[a, b] = rhs` unpacks the same way in the target dialect.
            js::Pat::Array(array) => Ok(Expr::new(ExprKind::Array(ArrayLit {
                elements: array
                    .elems
                    .iter()
                    .map(|element| match element {
                        Some(js::Pat::Ident(binding)) => {
                            Ok(Expr::ident(binding.id.sym.to_string()))
                        }
                        _ => Err(Error::Unsupported("destructuring assignment target".into())),
                    })
                    .collect::<Result<Vec<_>>>()?,
            }))),
            _ => Err(Error::Unsupported("assignment target".into())),
        },
    }
}

fn lower_lit(lit: &js::Lit) -> Result<Lit> {
    match lit {
        js::Lit::Null(_) => Ok(Lit::null()),
        js::Lit::Bool(boolean) => Ok(Lit::bool(boolean.value)),
        js::Lit::Num(number) => Ok(Lit::number(
            number.value,
            raw_text(&number.raw, || number.value.to_string()),
        )),
        js::Lit::Str(string) => Ok(Lit::string(
            string.value.to_string(),
            raw_text(&string.raw, || format!("{:?}", string.value)),
        )),
        _ => Err(Error::Unsupported("literal".into())),
    }
}

fn raw_text<T: ToString>(raw: &Option<T>, fallback: impl FnOnce() -> String) -> String {
    raw.as_ref().map(T::to_string).unwrap_or_else(fallback)
}

fn unary_op_str(op: js::UnaryOp) -> &'static str {
    match op {
        js::UnaryOp::Minus => "-",
        js::UnaryOp::Plus => "+",
        js::UnaryOp::Bang => "!",
        js::UnaryOp::Tilde => "~",
        js::UnaryOp::TypeOf => "typeof",
        js::UnaryOp::Void => "void",
        js::UnaryOp::Delete => "delete",
    }
}

fn update_op_str(op: js::UpdateOp) -> &'static str {
    match op {
        js::UpdateOp::PlusPlus => "++",
        js::UpdateOp::MinusMinus => "--",
    }
}

fn binary_op_str(op: js::BinaryOp) -> &'static str {
    match op {
        js::BinaryOp::EqEq => "==",
        js::BinaryOp::NotEq => "!=",
        js::BinaryOp::EqEqEq => "===",
        js::BinaryOp::NotEqEq => "!==",
        js::BinaryOp::Lt => "<",
        js::BinaryOp::LtEq => "<=",
        js::BinaryOp::Gt => ">",
        js::BinaryOp::GtEq => ">=",
        js::BinaryOp::LShift => "<<",
        js::BinaryOp::RShift => ">>",
        js::BinaryOp::ZeroFillRShift => ">>>",
        js::BinaryOp::Add => "+",
        js::BinaryOp::Sub => "-",
        js::BinaryOp::Mul => "*",
        js::BinaryOp::Div => "/",
        js::BinaryOp::Mod => "%",
        js::BinaryOp::BitOr => "|",
        js::BinaryOp::BitXor => "^",
        js::BinaryOp::BitAnd => "&",
        js::BinaryOp::LogicalOr => "||",
        js::BinaryOp::LogicalAnd => "&&",
        js::BinaryOp::In => "in",
        js::BinaryOp::InstanceOf => "instanceof",
        js::BinaryOp::Exp => "**",
        js::BinaryOp::NullishCoalescing => "??",
    }
}

fn assign_op_str(op: js::AssignOp) -> &'static str {
    match op {
        js::AssignOp::Assign => "=",
        js::AssignOp::AddAssign => "+=",
        js::AssignOp::SubAssign => "-=",
        js::AssignOp::MulAssign => "*=",
        js::AssignOp::DivAssign => "/=",
        js::AssignOp::ModAssign => "%=",
        js::AssignOp::LShiftAssign => "<<=",
        js::AssignOp::RShiftAssign => ">>=",
        js::AssignOp::ZeroFillRShiftAssign => ">>>=",
        js::AssignOp::BitOrAssign => "|=",
        js::AssignOp::BitXorAssign => "^=",
        js::AssignOp::BitAndAssign => "&=",
        js::AssignOp::ExpAssign => "**=",
        js::AssignOp::AndAssign => "&&=",
        js::AssignOp::OrAssign => "||=",
        js::AssignOp::NullishAssign => "??=",
    }
}
