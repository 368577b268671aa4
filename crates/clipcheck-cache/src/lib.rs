//! Schema Validator (C2) and Stage Cache (C3), combined because every
//! cache read/write is validation-gated.

pub mod cache;
pub mod error;
pub mod schema;

pub use cache::{get, put, put_value};
pub use error::{CacheError, CacheResult};
pub use schema::{validate, Artifact, SchemaName};
