//! JavaScript → Python transpilation pipeline.
//!
//! Sequencing only: parse through the frontend seam, run the configured
//! rewrite passes in order, run code generation once, read the root's text.

pub mod transpiler;

pub use js2py_core::error::{Error, Result};
pub use transpiler::Transpiler;
