//! JSON API for the Duta Desa resident pages.
//!
//! Exposes an axum [`Router`] backed by any
//! [`duta_core::store::ResidentStore`]. Sign-in and the landing page belong
//! to the server crate, which wraps this router in its session check.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(duta_api::api_router(store.clone()))
//! ```

pub mod dashboard;
pub mod error;
pub mod intake;
pub mod residents;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use duta_core::store::ResidentStore;

pub use error::ApiError;

/// Build the resident-page router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ResidentStore + 'static,
{
  Router::new()
    .route("/dashboard", get(dashboard::handler::<S>))
    .route("/data-penduduk", get(residents::list::<S>))
    .route("/data-penduduk/{id}", patch(residents::edit::<S>))
    .route(
      "/tambah-data-penduduk",
      get(intake::form).post(intake::create::<S>),
    )
    .with_state(store)
}
