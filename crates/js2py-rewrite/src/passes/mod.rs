// Passes - focused rewrite passes built on the pattern engine

pub mod bignumber;

pub use bignumber::bignumber;

use js2py_core::ast::Expr;
use js2py_core::debug;
use js2py_core::error::Result;
use js2py_core::visit::Visitor;

use crate::rules::RuleSet;

/// Rewrite visitor applying an ordered rule table on expression leave.
/// Matching is structural, so trying every expression kind is safe; a rule
/// can only fire on the kind its own template has at the root.
pub struct PatternRewriter {
    name: &'static str,
    rules: RuleSet,
}

impl PatternRewriter {
    pub fn new(name: &'static str, rules: RuleSet) -> Self {
        Self { name, rules }
    }
}

impl Visitor for PatternRewriter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn leave_expr(&mut self, node: &mut Expr) -> Result<Option<Expr>> {
        let replacement = self.rules.rewrite(node)?;
        if replacement.is_some() {
            debug!(pass = self.name, "rewrite rule hit");
        }
        Ok(replacement)
    }
}
