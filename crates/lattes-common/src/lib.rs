//! lattes-common: Shared types, errors, and the table model used across all
//! Lattes crates.

pub mod error;
pub mod entities;
pub mod table;

// Re-export commonly used types
pub use entities::{columns, EntityType};
pub use error::{LattesError, Result};
pub use table::{Row, Table, Value};
