//! Error type for `duta-store-sqlite`.

use duta_core::resident::ResidentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("document not found: {0}")]
  NotFound(ResidentId),

  /// A stored document that is not a JSON object.
  #[error("document {0} is not a JSON object")]
  MalformedDocument(String),

  /// A document that does not read back as a resident record.
  #[error("document {doc_id} is not a resident record: {source}")]
  UnreadableDocument {
    doc_id: String,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
