//! SQLite backend for the Duta Desa resident store.
//!
//! Emulates a document collection: each record is one JSON document keyed by
//! a store-assigned identifier. Wraps [`tokio_rusqlite`] so all database
//! access runs on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
