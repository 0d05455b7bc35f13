//! Rewrite passes: ordered pattern rule tables applied over the tree before
//! code generation.

pub mod passes;
pub mod rules;

pub use passes::{bignumber, PatternRewriter};
pub use rules::{RewriteRule, RuleSet};
