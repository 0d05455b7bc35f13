//! Python code generation for lowered JavaScript ASTs.

pub mod codegen;
pub mod indent;

pub use codegen::{PythonGenerator, UNTRANSLATABLE};
pub use indent::Indent;
