use js2py_core::ast::Expr;
use js2py_core::error::Result;
use js2py_core::pattern::Pattern;
use js2py_javascript::compile_pattern;

/// One `(from, to)` rewrite pair, compiled once and reused across matches.
pub struct RewriteRule {
    from: Pattern,
    to: Pattern,
}

impl RewriteRule {
    pub fn compile(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: compile_pattern(from)?,
            to: compile_pattern(to)?,
        })
    }

    /// A non-matching rule is simply skipped; only instantiation can fail.
    pub fn try_rewrite(&self, candidate: &Expr) -> Result<Option<Expr>> {
        match self.from.match_expr(candidate) {
            Some(captures) => Ok(Some(self.to.instantiate(&captures)?)),
            None => Ok(None),
        }
    }
}

/// Ordered rule table. Rules are tried in list order and the first match
/// wins; later rules are not consulted even if they would also match.
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn compile(pairs: &[(&str, &str)]) -> Result<Self> {
        let rules = pairs
            .iter()
            .map(|(from, to)| RewriteRule::compile(from, to))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rewrite(&self, candidate: &Expr) -> Result<Option<Expr>> {
        for rule in &self.rules {
            if let Some(replacement) = rule.try_rewrite(candidate)? {
                return Ok(Some(replacement));
            }
        }
        Ok(None)
    }
}
