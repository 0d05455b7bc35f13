use js2py_core::ast::{Expr, ExprKind, Program, StmtKind};
use js2py_core::error::{Error, Result};
use js2py_core::visit::traverse;
use js2py_javascript::parse_program;
use js2py_rewrite::{bignumber, PatternRewriter, RuleSet};
use pretty_assertions::assert_eq;

fn rewrite_with(pass: &mut PatternRewriter, source: &str) -> Result<Program> {
    let mut program = parse_program(source)?;
    traverse(&mut program, pass)?;
    Ok(program)
}

fn first_expr(program: &Program) -> &Expr {
    match &program.body[0].kind {
        StmtKind::Expr(expr) => expr,
        other => panic!("expected expression statement, found {other:?}"),
    }
}

#[test]
fn fluent_call_becomes_operator() -> Result<()> {
    let mut pass = bignumber()?;
    let program = rewrite_with(&mut pass, "total.plus(delta);")?;
    let ExprKind::Binary(binary) = &first_expr(&program).kind else {
        panic!("expected binary replacement");
    };
    assert_eq!(binary.op, "+");
    assert_eq!(binary.left.as_ident().unwrap().name, "total");
    assert_eq!(binary.right.as_ident().unwrap().name, "delta");
    Ok(())
}

#[test]
fn construction_unwraps_to_first_argument() -> Result<()> {
    let mut pass = bignumber()?;
    let program = rewrite_with(&mut pass, "var x = new BigN(10);")?;
    let StmtKind::VarDecl(decl) = &program.body[0].kind else {
        panic!("expected declaration");
    };
    let init = decl.declarations[0].init.as_ref().unwrap();
    assert!(matches!(init.kind, ExprKind::Lit(_)));
    Ok(())
}

#[test]
fn static_helper_rule_wins_over_method_rules() -> Result<()> {
    // `BigN.plus(x)` is claimed by the `BigN._1(_2)` rule, which precedes the
    // `_1.plus(_2)` method rule in the table.
    let mut pass = bignumber()?;
    let program = rewrite_with(&mut pass, "BigN.plus(x);")?;
    let ExprKind::Call(call) = &first_expr(&program).kind else {
        panic!("expected call replacement");
    };
    assert_eq!(call.callee.as_ident().unwrap().name, "plus");
    assert_eq!(call.arguments[0].as_ident().unwrap().name, "x");
    Ok(())
}

#[test]
fn rule_order_decides_between_overlapping_rules() -> Result<()> {
    let pairs_a = [("_1.plus(_2)", "_1 + _2"), ("_1.plus(_2)", "add(_1, _2)")];
    let pairs_b = [("_1.plus(_2)", "add(_1, _2)"), ("_1.plus(_2)", "_1 + _2")];

    let mut first_wins = PatternRewriter::new("order-a", RuleSet::compile(&pairs_a)?);
    let program = rewrite_with(&mut first_wins, "a.plus(b);")?;
    assert!(matches!(first_expr(&program).kind, ExprKind::Binary(_)));

    let mut reordered = PatternRewriter::new("order-b", RuleSet::compile(&pairs_b)?);
    let program = rewrite_with(&mut reordered, "a.plus(b);")?;
    assert!(matches!(first_expr(&program).kind, ExprKind::Call(_)));
    Ok(())
}

#[test]
fn miss_keeps_the_node() -> Result<()> {
    let mut pass = bignumber()?;
    let program = rewrite_with(&mut pass, "total.minus(a, b);")?;
    // Arity mismatch: the rule list misses and the call stays as written.
    let ExprKind::Call(call) = &first_expr(&program).kind else {
        panic!("expected the original call");
    };
    assert_eq!(call.arguments.len(), 2);
    Ok(())
}

#[test]
fn repeated_capture_gates_the_rewrite() -> Result<()> {
    let pairs = [("_1.plus(_1)", "2 * _1")];
    let mut doubling = PatternRewriter::new("doubling", RuleSet::compile(&pairs)?);

    let program = rewrite_with(&mut doubling, "a.plus(a);")?;
    assert!(matches!(first_expr(&program).kind, ExprKind::Binary(_)));

    let mut doubling = PatternRewriter::new("doubling", RuleSet::compile(&pairs)?);
    let program = rewrite_with(&mut doubling, "a.plus(b);")?;
    assert!(matches!(first_expr(&program).kind, ExprKind::Call(_)));
    Ok(())
}

#[test]
fn unbound_template_wildcard_surfaces() -> Result<()> {
    let pairs = [("_1.plus(_2)", "_1 + _3")];
    let mut broken = PatternRewriter::new("broken", RuleSet::compile(&pairs)?);
    let mut program = parse_program("a.plus(b);")?;
    match traverse(&mut program, &mut broken) {
        Err(Error::UnboundWildcard(3)) => Ok(()),
        other => panic!("expected unbound wildcard error, got {other:?}"),
    }
}

#[test]
fn rewrites_nested_inside_statements() -> Result<()> {
    let mut pass = bignumber()?;
    let program = rewrite_with(
        &mut pass,
        "if (x) { return balance.times(rate.plus(1)); }",
    )?;
    let StmtKind::If(stmt_if) = &program.body[0].kind else {
        panic!("expected if statement");
    };
    let StmtKind::Block(block) = &stmt_if.consequent.kind else {
        panic!("expected block consequent");
    };
    let StmtKind::Return(ret) = &block.body[0].kind else {
        panic!("expected return statement");
    };
    let ExprKind::Binary(outer) = &ret.argument.as_ref().unwrap().kind else {
        panic!("expected outer rewrite");
    };
    assert_eq!(outer.op, "*");
    let ExprKind::Binary(inner) = &outer.right.kind else {
        panic!("expected inner rewrite");
    };
    assert_eq!(inner.op, "+");
    Ok(())
}
