use js2py_core::error::Result;

use crate::passes::PatternRewriter;
use crate::rules::RuleSet;

/// Ordered rewrite table for the fluent `BigN` arbitrary-precision API. The
/// first rule unwraps the value-object construction into its scalar payload;
/// the second catches static helpers before the method rules can claim them.
const BIGNUMBER_RULES: &[(&str, &str)] = &[
    ("new BigN(_1)", "_1"),
    ("BigN._1(_2)", "_1(_2)"),
    ("_1.minus(_2)", "_1 - _2"),
    ("_1.plus(_2)", "_1 + _2"),
    ("_1.times(_2)", "_1 * _2"),
    ("_1.dividedBy(_2)", "_1 / _2"),
];

/// Build the stock BigNumber unwrapping pass.
pub fn bignumber() -> Result<PatternRewriter> {
    Ok(PatternRewriter::new(
        "bignumber",
        RuleSet::compile(BIGNUMBER_RULES)?,
    ))
}
