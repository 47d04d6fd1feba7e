//! Domain model for symbolify
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time separation of offsets and plain addresses via newtypes
//! - A single display format for resolved symbols
//! - Structured error handling

pub mod errors;
pub mod types;

pub use types::{LoadOffset, SymbolEntry};

pub use errors::SymbolifyError;
