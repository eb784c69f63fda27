//! Builder API for ergonomic machine definition construction.
//!
//! This module provides the fluent builder and macros for declaring
//! machine definitions with minimal boilerplate while keeping all
//! rule validation at declaration time.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::DefinitionBuilder;
