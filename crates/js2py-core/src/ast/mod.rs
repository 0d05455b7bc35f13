//! AST are trees, so Box<T> is fine

use crate::common_struct;

mod expr;
mod ident;
pub mod json;
mod pat;
mod stmt;

pub use expr::*;
pub use ident::*;
pub use pat::*;
pub use stmt::*;

/// Shared slot for the text synthesized by a code-generation pass.
///
/// Empty until the node has been fully visited by such a pass; rewrite passes
/// never touch it.
pub type TextSlot = Option<String>;

common_struct! {
    pub struct Program {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        pub body: Vec<Stmt>,
    }
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { text: None, body }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}
