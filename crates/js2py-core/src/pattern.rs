//! Structural pattern matching and template instantiation over expression
//! subtrees.
//!
//! A pattern is an ordinary expression tree in which reserved `_<n>`
//! identifiers have been promoted to typed [`ExprKind::Wildcard`] leaves. The
//! same representation serves both sides of a rewrite rule: the `from` side
//! is matched against candidates, the `to` side is instantiated with the
//! captures the match produced.

use std::collections::BTreeMap;

use crate::ast::{
    ArrayLit, AssignExpr, BinExpr, CallExpr, Expr, ExprKind, MemberExpr, NewExpr, ObjectLit,
    Property, TemplateLit, UnaryExpr, UpdateExpr,
};
use crate::common_struct;
use crate::error::{Error, Result};
use crate::visit::{traverse_expr, Visitor};

/// Capture index → the concrete subtree it matched.
pub type CaptureMap = BTreeMap<u32, Expr>;

common_struct! {
    pub struct Pattern {
        root: Expr,
    }
}

impl Pattern {
    /// Promote an already-parsed template into a pattern, converting every
    /// `_<n>` identifier into a wildcard leaf carrying capture index `n`.
    pub fn from_expr(mut root: Expr) -> Result<Self> {
        traverse_expr(&mut root, &mut WildcardMarker)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Total structural match: either the whole pattern matches and every
    /// wildcard is bound, or the candidate is left alone. A capture index
    /// appearing twice must bind structurally equal subtrees.
    pub fn match_expr(&self, candidate: &Expr) -> Option<CaptureMap> {
        let mut captures = CaptureMap::new();
        if match_node(&self.root, candidate, &mut captures) {
            Some(captures)
        } else {
            None
        }
    }

    /// Build a fresh tree from the template, substituting each wildcard with
    /// a copy of its capture. The captured subtree's original position stays
    /// valid; nothing is shared.
    pub fn instantiate(&self, captures: &CaptureMap) -> Result<Expr> {
        instantiate_node(&self.root, captures)
    }
}

fn wildcard_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

struct WildcardMarker;

impl Visitor for WildcardMarker {
    fn name(&self) -> &'static str {
        "wildcard-marker"
    }

    fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
        if let Some(index) = node.as_ident().and_then(|ident| wildcard_index(&ident.name)) {
            return Ok(Some(Expr::wildcard(index)));
        }
        Ok(None)
    }
}

fn match_node(pattern: &Expr, candidate: &Expr, captures: &mut CaptureMap) -> bool {
    if let ExprKind::Wildcard(index) = &pattern.kind {
        return match captures.get(index) {
            Some(bound) => structural_eq(bound, candidate),
            None => {
                captures.insert(*index, candidate.clone());
                true
            }
        };
    }
    match (&pattern.kind, &candidate.kind) {
        (ExprKind::Ident(a), ExprKind::Ident(b)) => a.name == b.name,
        (ExprKind::Lit(a), ExprKind::Lit(b)) => a.value == b.value,
        (ExprKind::This(_), ExprKind::This(_)) => true,
        (ExprKind::Super(_), ExprKind::Super(_)) => true,
        (ExprKind::Array(a), ExprKind::Array(b)) => {
            match_all(&a.elements, &b.elements, captures)
        }
        (ExprKind::Object(a), ExprKind::Object(b)) => {
            a.properties.len() == b.properties.len()
                && a.properties.iter().zip(&b.properties).all(|(x, y)| {
                    match_node(&x.key, &y.key, captures) && match_node(&x.value, &y.value, captures)
                })
        }
        (ExprKind::Template(a), ExprKind::Template(b)) => {
            a.quasis == b.quasis && match_all(&a.expressions, &b.expressions, captures)
        }
        (ExprKind::Unary(a), ExprKind::Unary(b)) => {
            a.op == b.op && match_node(&a.argument, &b.argument, captures)
        }
        (ExprKind::Update(a), ExprKind::Update(b)) => {
            a.op == b.op && a.prefix == b.prefix && match_node(&a.argument, &b.argument, captures)
        }
        (ExprKind::Binary(a), ExprKind::Binary(b)) => {
            a.op == b.op
                && match_node(&a.left, &b.left, captures)
                && match_node(&a.right, &b.right, captures)
        }
        (ExprKind::Assign(a), ExprKind::Assign(b)) => {
            a.op == b.op
                && match_node(&a.left, &b.left, captures)
                && match_node(&a.right, &b.right, captures)
        }
        (ExprKind::Member(a), ExprKind::Member(b)) => {
            match_node(&a.object, &b.object, captures)
                && match_node(&a.property, &b.property, captures)
        }
        (ExprKind::Call(a), ExprKind::Call(b)) => {
            match_node(&a.callee, &b.callee, captures)
                && match_all(&a.arguments, &b.arguments, captures)
        }
        (ExprKind::New(a), ExprKind::New(b)) => {
            match_node(&a.callee, &b.callee, captures)
                && match_all(&a.arguments, &b.arguments, captures)
        }
        _ => false,
    }
}

fn match_all(patterns: &[Expr], candidates: &[Expr], captures: &mut CaptureMap) -> bool {
    patterns.len() == candidates.len()
        && patterns
            .iter()
            .zip(candidates)
            .all(|(pattern, candidate)| match_node(pattern, candidate, captures))
}

/// Structural equality between two concrete subtrees. A bound capture holds
/// no wildcards, so matching it against the other side degenerates into an
/// equality check that ignores synthesized text slots.
fn structural_eq(a: &Expr, b: &Expr) -> bool {
    let mut scratch = CaptureMap::new();
    match_node(a, b, &mut scratch)
}

fn instantiate_node(template: &Expr, captures: &CaptureMap) -> Result<Expr> {
    if let ExprKind::Wildcard(index) = &template.kind {
        return captures
            .get(index)
            .cloned()
            .ok_or(Error::UnboundWildcard(*index));
    }
    let kind = match &template.kind {
        ExprKind::Ident(_)
        | ExprKind::Lit(_)
        | ExprKind::This(_)
        | ExprKind::Super(_)
        | ExprKind::Wildcard(_) => template.kind.clone(),
        ExprKind::Array(array) => ExprKind::Array(ArrayLit {
            elements: instantiate_all(&array.elements, captures)?,
        }),
        ExprKind::Object(object) => {
            let properties = object
                .properties
                .iter()
                .map(|property| {
                    Ok(Property::new(
                        instantiate_node(&property.key, captures)?,
                        instantiate_node(&property.value, captures)?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            ExprKind::Object(ObjectLit { properties })
        }
        ExprKind::Template(template_lit) => ExprKind::Template(TemplateLit {
            quasis: template_lit.quasis.clone(),
            expressions: instantiate_all(&template_lit.expressions, captures)?,
        }),
        ExprKind::Unary(unary) => ExprKind::Unary(UnaryExpr {
            op: unary.op.clone(),
            argument: Box::new(instantiate_node(&unary.argument, captures)?),
        }),
        ExprKind::Update(update) => ExprKind::Update(UpdateExpr {
            op: update.op.clone(),
            prefix: update.prefix,
            argument: Box::new(instantiate_node(&update.argument, captures)?),
        }),
        ExprKind::Binary(binary) => ExprKind::Binary(BinExpr {
            op: binary.op.clone(),
            left: Box::new(instantiate_node(&binary.left, captures)?),
            right: Box::new(instantiate_node(&binary.right, captures)?),
        }),
        ExprKind::Assign(assign) => ExprKind::Assign(AssignExpr {
            op: assign.op.clone(),
            left: Box::new(instantiate_node(&assign.left, captures)?),
            right: Box::new(instantiate_node(&assign.right, captures)?),
        }),
        ExprKind::Member(member) => ExprKind::Member(MemberExpr {
            object: Box::new(instantiate_node(&member.object, captures)?),
            property: Box::new(instantiate_node(&member.property, captures)?),
        }),
        ExprKind::Call(call) => ExprKind::Call(CallExpr {
            callee: Box::new(instantiate_node(&call.callee, captures)?),
            arguments: instantiate_all(&call.arguments, captures)?,
        }),
        ExprKind::New(ctor) => ExprKind::New(NewExpr {
            callee: Box::new(instantiate_node(&ctor.callee, captures)?),
            arguments: instantiate_all(&ctor.arguments, captures)?,
        }),
    };
    Ok(Expr::new(kind))
}

fn instantiate_all(templates: &[Expr], captures: &CaptureMap) -> Result<Vec<Expr>> {
    templates
        .iter()
        .map(|template| instantiate_node(template, captures))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Lit;

    fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
        ExprKind::Call(CallExpr {
            callee: Box::new(callee),
            arguments,
        })
        .into()
    }

    fn member(object: Expr, property: Expr) -> Expr {
        ExprKind::Member(MemberExpr {
            object: Box::new(object),
            property: Box::new(property),
        })
        .into()
    }

    fn binary(op: &str, left: Expr, right: Expr) -> Expr {
        ExprKind::Binary(BinExpr {
            op: op.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
        .into()
    }

    /// `_1.plus(_2)`
    fn plus_pattern() -> Pattern {
        let template = call(
            member(Expr::ident("_1"), Expr::ident("plus")),
            vec![Expr::ident("_2")],
        );
        Pattern::from_expr(template).unwrap()
    }

    #[test]
    fn marks_wildcards_and_binds_captures() {
        let candidate = call(
            member(Expr::ident("total"), Expr::ident("plus")),
            vec![Expr::ident("delta")],
        );
        let captures = plus_pattern().match_expr(&candidate).unwrap();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[&1].as_ident().unwrap().name, "total");
        assert_eq!(captures[&2].as_ident().unwrap().name, "delta");
    }

    #[test]
    fn method_name_must_match() {
        let candidate = call(
            member(Expr::ident("total"), Expr::ident("minus")),
            vec![Expr::ident("delta")],
        );
        assert!(plus_pattern().match_expr(&candidate).is_none());
    }

    #[test]
    fn arity_must_match() {
        let candidate = call(
            member(Expr::ident("total"), Expr::ident("plus")),
            vec![Expr::ident("a"), Expr::ident("b")],
        );
        assert!(plus_pattern().match_expr(&candidate).is_none());
    }

    #[test]
    fn repeated_capture_requires_structural_equality() {
        // `_1 + _1`
        let pattern =
            Pattern::from_expr(binary("+", Expr::ident("_1"), Expr::ident("_1"))).unwrap();

        let same = binary("+", Expr::ident("a"), Expr::ident("a"));
        assert!(pattern.match_expr(&same).is_some());

        let different = binary("+", Expr::ident("a"), Expr::ident("b"));
        assert!(pattern.match_expr(&different).is_none());
    }

    #[test]
    fn repeated_capture_ignores_text_slots() {
        let pattern =
            Pattern::from_expr(binary("+", Expr::ident("_1"), Expr::ident("_1"))).unwrap();

        let mut annotated = Expr::ident("a");
        annotated.set_text("a");
        let candidate = binary("+", annotated, Expr::ident("a"));
        assert!(pattern.match_expr(&candidate).is_some());
    }

    #[test]
    fn instantiate_replaces_wildcards_by_value() {
        // `_1 + _2` instantiated from a match of `_1.plus(_2)`.
        let to = Pattern::from_expr(binary("+", Expr::ident("_1"), Expr::ident("_2"))).unwrap();
        let candidate = call(
            member(Expr::ident("total"), Expr::ident("plus")),
            vec![Expr::lit(Lit::number(2.0, "2"))],
        );
        let captures = plus_pattern().match_expr(&candidate).unwrap();
        let result = to.instantiate(&captures).unwrap();

        let ExprKind::Binary(result_bin) = &result.kind else {
            panic!("expected binary result");
        };
        assert_eq!(result_bin.left.as_ident().unwrap().name, "total");
        // The capture's original tree position remains independently valid.
        assert_eq!(captures[&1].as_ident().unwrap().name, "total");
    }

    #[test]
    fn instantiate_fails_on_unbound_wildcard() {
        let to = Pattern::from_expr(binary("+", Expr::ident("_1"), Expr::ident("_3"))).unwrap();
        let candidate = call(
            member(Expr::ident("total"), Expr::ident("plus")),
            vec![Expr::ident("delta")],
        );
        let captures = plus_pattern().match_expr(&candidate).unwrap();
        match to.instantiate(&captures) {
            Err(Error::UnboundWildcard(3)) => {}
            other => panic!("expected unbound wildcard error, got {other:?}"),
        }
    }

    #[test]
    fn match_is_reflexive_over_instantiation() {
        // match(T, instantiate(T, captures)) recovers the original captures.
        let pattern = plus_pattern();
        let mut captures = CaptureMap::new();
        captures.insert(1, Expr::ident("total"));
        captures.insert(2, binary("*", Expr::ident("a"), Expr::ident("b")));

        let instantiated = pattern.instantiate(&captures).unwrap();
        let recovered = pattern.match_expr(&instantiated).unwrap();
        assert_eq!(recovered, captures);
    }

    #[test]
    fn literal_values_match_regardless_of_spelling() {
        let pattern = Pattern::from_expr(Expr::lit(Lit::number(1.0, "1"))).unwrap();
        assert!(pattern
            .match_expr(&Expr::lit(Lit::number(1.0, "1.0")))
            .is_some());
        assert!(pattern
            .match_expr(&Expr::lit(Lit::number(2.0, "2")))
            .is_none());
    }
}
