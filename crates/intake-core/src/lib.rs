//! Core domain models and storage for the intake webhook indexing service.
//!
//! Provides the indexed-record domain types, the error taxonomy, and the
//! PostgreSQL storage layer. The API crate depends on these foundations;
//! nothing here knows about HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;

pub use error::{CoreError, Result};
pub use models::{IndexedRecord, RecordId};
pub use storage::Storage;
