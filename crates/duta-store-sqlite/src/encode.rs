//! Conversions between domain types and the JSON text stored in the
//! `documents.data` column.
//!
//! Documents are stored without their identifier; it lives in `doc_id` and is
//! spliced back in as `"id"` on read.

use duta_core::resident::{NewResident, Resident, ResidentPatch};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// A fresh, unguessable document identifier.
pub fn new_doc_id() -> String { Uuid::new_v4().simple().to_string() }

// ─── Writes ──────────────────────────────────────────────────────────────────

pub fn encode_new_resident(input: &NewResident) -> Result<String> {
  Ok(serde_json::to_string(input)?)
}

/// The patch as a JSON object, for `json_patch()`. Absent fields are omitted,
/// so they leave the stored keys untouched.
pub fn encode_patch(patch: &ResidentPatch) -> Result<String> {
  Ok(serde_json::to_string(patch)?)
}

/// An exported document, checked to read back as a [`Resident`] before it is
/// stored.
pub fn encode_import(doc_id: &str, document: &Value) -> Result<String> {
  let Value::Object(fields) = document else {
    return Err(Error::MalformedDocument(doc_id.to_owned()));
  };
  let mut fields = fields.clone();
  fields.remove("id");
  let data = serde_json::to_string(&fields)?;

  let raw = RawDocument { doc_id: doc_id.to_owned(), data };
  if let Err(e) = raw.decode() {
    return Err(Error::UnreadableDocument { doc_id: doc_id.to_owned(), source: e });
  }
  Ok(raw.data)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub doc_id: String,
  pub data:   String,
}

impl RawDocument {
  pub fn into_resident(self) -> Result<Resident> {
    let Value::Object(_) = serde_json::from_str::<Value>(&self.data)? else {
      return Err(Error::MalformedDocument(self.doc_id));
    };
    Ok(self.decode()?)
  }

  fn decode(&self) -> serde_json::Result<Resident> {
    let mut fields: serde_json::Map<String, Value> = serde_json::from_str(&self.data)?;
    fields.insert("id".to_owned(), Value::String(self.doc_id.clone()));
    serde_json::from_value(Value::Object(fields))
  }
}
