//! The `ResidentStore` trait.
//!
//! Implemented by storage backends (e.g. `duta-store-sqlite`). The page logic
//! in this crate and the HTTP layer depend on this abstraction only.

use std::future::Future;

use crate::{
  Error, Result,
  resident::{NewResident, Resident, ResidentId, ResidentPatch},
};

/// Abstraction over the `penduduk` document collection.
///
/// The store executes no queries of its own: pages fetch everything and
/// filter in memory. Records are never deleted.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait ResidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every record in the collection, in no particular order.
  fn fetch_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Resident>, Self::Error>> + Send + '_;

  /// Persist a new record and return the identifier the store assigned.
  fn create(
    &self,
    input: NewResident,
  ) -> impl Future<Output = Result<ResidentId, Self::Error>> + Send + '_;

  /// Write only the fields present in `patch`. Fails if `id` is unknown.
  fn update(
    &self,
    id: ResidentId,
    patch: ResidentPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Fetch the full snapshot a page works from, mapping backend failures to
/// [`Error::FetchFailed`].
pub async fn load_snapshot<S>(store: &S) -> Result<Vec<Resident>>
where
  S: ResidentStore,
{
  store
    .fetch_all()
    .await
    .map_err(|e| Error::FetchFailed(Box::new(e)))
}
