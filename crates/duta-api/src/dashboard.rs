//! Handler for `GET /dashboard`.

use std::sync::Arc;

use axum::{Json, extract::State};
use duta_core::{
  age,
  stats::Statistics,
  store::{ResidentStore, load_snapshot},
};
use serde::Serialize;

/// Dashboard payload: the statistics plus an optional notice when the
/// collection could not be loaded.
#[derive(Debug, Serialize)]
pub struct DashboardBody {
  #[serde(flatten)]
  pub stats:  Statistics,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notice: Option<String>,
}

/// `GET /dashboard`
///
/// A failed fetch is not an error response: the page shows zeros and a
/// notice instead.
pub async fn handler<S>(State(store): State<Arc<S>>) -> Json<DashboardBody>
where
  S: ResidentStore,
{
  let today = age::today();
  match load_snapshot(store.as_ref()).await {
    Ok(records) => Json(DashboardBody {
      stats:  Statistics::compute(&records, today),
      notice: None,
    }),
    Err(e) => {
      tracing::error!(error = %e, "dashboard: could not load residents");
      Json(DashboardBody {
        stats:  Statistics::empty(today),
        notice: Some(e.to_string()),
      })
    }
  }
}
