#[macro_use]
pub mod macros;

pub mod ast;
pub mod error;
pub mod frontend;
pub mod pattern;
pub mod visit;

// Re-export commonly used items for convenience
pub use tracing;

pub use frontend::SourceFrontend;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
