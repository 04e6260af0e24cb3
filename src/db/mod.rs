//! Storage handle for the SQLite database.
//!
//! This module provides:
//! - The single shared connection (`Database`)
//! - Positional query parameters (`Value`)

pub mod connection;
pub mod value;

pub use connection::Database;
pub use value::Value;
