//! Settings storage module for Froyocomb
//!
//! Persists per-site reference points behind a small key-value backend
//! trait, with SQLite and in-memory implementations.

mod backend;
mod database;
mod error;
mod migrations;
mod reference_store;

pub use backend::{InMemoryBackend, KeyValueBackend, StorageKey};
pub use database::Database;
pub use error::StorageError;
pub use migrations::MigrationReport;
pub use reference_store::ReferenceStore;
