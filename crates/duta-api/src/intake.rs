//! Handlers for the "add resident" page.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tambah-data-penduduk` | Blank form with defaults and the offered options |
//! | `POST` | `/tambah-data-penduduk` | Body: [`IntakeForm`]; returns 201 + `{"id": ...}` |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use duta_core::{
  age,
  intake::IntakeForm,
  resident::{Category, Gender, ResidentId},
  store::ResidentStore,
};
use serde::Serialize;

use crate::error::ApiError;

// ─── Blank form ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FormBody {
  pub defaults:   IntakeForm,
  pub genders:    Vec<Gender>,
  pub categories: Vec<Category>,
}

/// `GET /tambah-data-penduduk`
pub async fn form() -> Json<FormBody> {
  Json(FormBody {
    defaults:   IntakeForm::new(),
    genders:    vec![Gender::Male, Gender::Female],
    categories: Category::ALL.to_vec(),
  })
}

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreatedBody {
  pub id: ResidentId,
}

/// `POST /tambah-data-penduduk`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(mut form): Json<IntakeForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ResidentStore,
{
  match form.submit(store.as_ref(), age::today()).await {
    Ok(id) => {
      tracing::info!(%id, "resident added");
      Ok((StatusCode::CREATED, Json(CreatedBody { id })))
    }
    Err(e) if e.is_validation() => {
      tracing::warn!(error = %e, "intake rejected");
      Err(e.into())
    }
    Err(e) => {
      tracing::error!(error = %e, "intake failed");
      Err(e.into())
    }
  }
}
