//! JSON snapshots of lowered programs, for inspection and persistence by
//! downstream tooling.

use crate::ast::Program;
use crate::error::Result;

pub fn to_json(program: &Program) -> Result<String> {
    Ok(serde_json::to_string_pretty(program)?)
}

pub fn from_json(text: &str) -> Result<Program> {
    Ok(serde_json::from_str(text)?)
}
