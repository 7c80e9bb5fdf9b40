//! Handlers for the resident list page.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/data-penduduk` | Optional `?q=<name>&page=<n>`; 10 rows per page |
//! | `PATCH` | `/data-penduduk/{id}` | Body: editable wire keys → string values |

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
};
use duta_core::{
  editor::{EditField, Editor},
  resident::{Resident, ResidentId},
  store::{ResidentStore, load_snapshot},
  table::{PageView, ResidentTable},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Name search; empty shows everyone.
  #[serde(default)]
  pub q:    String,
  /// 1-based page number.
  pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListBody {
  #[serde(flatten)]
  pub view:   PageView,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notice: Option<String>,
}

/// `GET /data-penduduk[?q=...][&page=...]`
///
/// A failed fetch renders an empty table with a notice.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Json<ListBody>
where
  S: ResidentStore,
{
  let (records, notice) = match load_snapshot(store.as_ref()).await {
    Ok(records) => (records, None),
    Err(e) => {
      tracing::error!(error = %e, "resident list: could not load residents");
      (Vec::new(), Some(e.to_string()))
    }
  };

  let mut table = ResidentTable::new(records);
  table.search(&params.q);
  table.set_page(params.page.unwrap_or(1));

  Json(ListBody { view: table.view(), notice })
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `PATCH /data-penduduk/{id}`, body e.g. `{"kategori":"Mati"}`
///
/// Returns the record as saved. Name, gender and creation time cannot be
/// changed here.
pub async fn edit<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(changes): Json<BTreeMap<String, String>>,
) -> Result<Json<Resident>, ApiError>
where
  S: ResidentStore,
{
  let id = ResidentId::new(id);
  let mut table = ResidentTable::new(load_snapshot(store.as_ref()).await?);
  let record = table
    .records()
    .iter()
    .find(|r| r.id == id)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("resident {id} not found")))?;

  let mut editor = Editor::new();
  editor.begin(&record);
  for (key, value) in &changes {
    editor.change(EditField::parse(key, value)?)?;
  }

  let saved = editor.commit(store.as_ref(), &mut table).await.map_err(|e| {
    tracing::error!(%id, error = %e, "resident update failed");
    ApiError::from(e)
  })?;
  tracing::info!(%id, "resident updated");
  Ok(Json(saved))
}
