pub mod book;
pub mod enums;
pub mod error;

// Re-export the core types to provide a clean public API.
pub use book::{Book, FieldValue, NewBook};
pub use enums::{Stage, StagePolicy};
pub use error::CoreError;
