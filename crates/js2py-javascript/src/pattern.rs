use js2py_core::ast::StmtKind;
use js2py_core::error::{Error, Result};
use js2py_core::pattern::Pattern;

use crate::frontend::parse_program;

/// Compile rewrite-pattern template text through the main grammar.
///
/// A template must parse as exactly one expression statement; its `_<n>`
/// identifiers become typed wildcard leaves.
pub fn compile_pattern(template: &str) -> Result<Pattern> {
    let mut program = parse_program(template).map_err(|error| match error {
        Error::Parse(message) | Error::Unsupported(message) => {
            Error::MalformedPattern(format!("{template}: {message}"))
        }
        other => other,
    })?;
    if program.body.len() != 1 {
        return Err(Error::MalformedPattern(template.to_string()));
    }
    let stmt = program.body.remove(0);
    match stmt.kind {
        StmtKind::Expr(expr) => Pattern::from_expr(expr),
        _ => Err(Error::MalformedPattern(template.to_string())),
    }
}
