//! Core types and page logic for the Duta Desa resident registry.
//!
//! This crate has no HTTP or database dependencies. The
//! dashboard aggregation, the paginated resident table, the record editor and
//! the intake form all live here as plain state machines over a
//! [`store::ResidentStore`].

pub mod age;
pub mod editor;
pub mod error;
pub mod intake;
pub mod resident;
pub mod stats;
pub mod store;
pub mod table;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
