//! Resident records, the sole entity of the `penduduk` collection.
//!
//! Field names on the wire are the collection's existing document keys
//! (`nama`, `jenis-kelamin`, `tanggal-lahir`, ...), so documents written by
//! earlier clients deserialise unchanged.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Name of the document collection holding resident records.
pub const COLLECTION: &str = "penduduk";

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Opaque document identifier assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidentId(String);

impl ResidentId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ResidentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Timestamp ───────────────────────────────────────────────────────────────

/// A point in time stored as `{ "seconds": .., "nanoseconds": .. }`.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize,
  Deserialize,
)]
pub struct Timestamp {
  pub seconds:     i64,
  pub nanoseconds: u32,
}

impl Timestamp {
  pub fn now() -> Self { Utc::now().into() }

  pub fn from_seconds(seconds: i64) -> Self { Self { seconds, nanoseconds: 0 } }
}

impl From<DateTime<Utc>> for Timestamp {
  fn from(dt: DateTime<Utc>) -> Self {
    Self {
      seconds:     dt.timestamp(),
      nanoseconds: dt.timestamp_subsec_nanos(),
    }
  }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Gender as recorded on the intake form.
///
/// Stored documents may carry values no form ever offered; those are kept
/// verbatim so reads never fail on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
  #[default]
  Male,
  Female,
  Unrecognized(String),
}

impl Gender {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Male => "Laki-laki",
      Self::Female => "Perempuan",
      Self::Unrecognized(other) => other,
    }
  }

  pub fn is_recognized(&self) -> bool { !matches!(self, Self::Unrecognized(_)) }
}

impl From<String> for Gender {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Laki-laki" => Self::Male,
      "Perempuan" => Self::Female,
      _ => Self::Unrecognized(s),
    }
  }
}

impl From<Gender> for String {
  fn from(g: Gender) -> Self {
    match g {
      Gender::Unrecognized(s) => s,
      other => other.as_str().to_owned(),
    }
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The demographic event a record represents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
  #[default]
  IncomingResident,
  OutgoingResident,
  Birth,
  Death,
  Unrecognized(String),
}

impl Category {
  /// The four categories offered by the edit and intake forms.
  pub const ALL: [Category; 4] = [
    Category::IncomingResident,
    Category::OutgoingResident,
    Category::Birth,
    Category::Death,
  ];

  pub fn as_str(&self) -> &str {
    match self {
      Self::IncomingResident => "Penduduk Masuk",
      Self::OutgoingResident => "Penduduk Keluar",
      Self::Birth => "Lahir",
      Self::Death => "Mati",
      Self::Unrecognized(other) => other,
    }
  }

  pub fn is_recognized(&self) -> bool { !matches!(self, Self::Unrecognized(_)) }

  /// A record still counts towards the resident total unless it marks a death
  /// or a departure.
  pub fn is_active(&self) -> bool {
    !matches!(self, Self::Death | Self::OutgoingResident)
  }
}

impl From<String> for Category {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Penduduk Masuk" => Self::IncomingResident,
      "Penduduk Keluar" => Self::OutgoingResident,
      "Lahir" => Self::Birth,
      "Mati" => Self::Death,
      _ => Self::Unrecognized(s),
    }
  }
}

impl From<Category> for String {
  fn from(c: Category) -> Self {
    match c {
      Category::Unrecognized(s) => s,
      other => other.as_str().to_owned(),
    }
  }
}

// ─── Resident ────────────────────────────────────────────────────────────────

/// A resident record as read back from the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
  pub id:              ResidentId,
  #[serde(rename = "nama")]
  pub name:            String,
  #[serde(rename = "jenis-kelamin")]
  pub gender:          Gender,
  #[serde(rename = "kategori")]
  pub category:        Category,
  #[serde(rename = "keterangan", default)]
  pub note:            String,
  #[serde(rename = "tanggal-lahir")]
  pub birth_date:      NaiveDate,
  /// Age in whole years on the day the record was created. Never recomputed.
  #[serde(rename = "umur", default)]
  pub age_at_creation: String,
  #[serde(rename = "tanggal", default)]
  pub created_at:      Timestamp,
  /// Older documents may lack this field.
  #[serde(
    rename = "tanggal-update",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at:      Option<Timestamp>,
}

impl Resident {
  /// Seconds component of `updated_at`, with a missing timestamp read as zero.
  pub fn updated_seconds(&self) -> i64 {
    self.updated_at.map(|t| t.seconds).unwrap_or(0)
  }
}

// ─── NewResident ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::ResidentStore::create`]. The identifier is
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResident {
  #[serde(rename = "nama")]
  pub name:            String,
  #[serde(rename = "jenis-kelamin")]
  pub gender:          Gender,
  #[serde(rename = "kategori")]
  pub category:        Category,
  #[serde(rename = "keterangan")]
  pub note:            String,
  #[serde(rename = "tanggal-lahir")]
  pub birth_date:      NaiveDate,
  #[serde(rename = "umur")]
  pub age_at_creation: String,
  #[serde(rename = "tanggal")]
  pub created_at:      Timestamp,
  #[serde(rename = "tanggal-update")]
  pub updated_at:      Timestamp,
}

impl NewResident {
  /// The record as it reads back once the store has assigned `id`.
  pub fn into_resident(self, id: ResidentId) -> Resident {
    Resident {
      id,
      name: self.name,
      gender: self.gender,
      category: self.category,
      note: self.note,
      birth_date: self.birth_date,
      age_at_creation: self.age_at_creation,
      created_at: self.created_at,
      updated_at: Some(self.updated_at),
    }
  }
}

// ─── ResidentPatch ───────────────────────────────────────────────────────────

/// A partial update. Only the present fields are written; `updated_at` is
/// always part of the patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentPatch {
  #[serde(rename = "kategori", skip_serializing_if = "Option::is_none")]
  pub category:   Option<Category>,
  #[serde(rename = "keterangan", skip_serializing_if = "Option::is_none")]
  pub note:       Option<String>,
  #[serde(rename = "tanggal-lahir", skip_serializing_if = "Option::is_none")]
  pub birth_date: Option<NaiveDate>,
  #[serde(rename = "tanggal-update")]
  pub updated_at: Timestamp,
}

impl ResidentPatch {
  /// A patch that touches nothing but `updated_at`.
  pub fn touch(updated_at: Timestamp) -> Self {
    Self { category: None, note: None, birth_date: None, updated_at }
  }

  /// Every editable field of `draft`, stamped with `updated_at`.
  pub fn from_draft(draft: &Resident, updated_at: Timestamp) -> Self {
    Self {
      category: Some(draft.category.clone()),
      note: Some(draft.note.clone()),
      birth_date: Some(draft.birth_date),
      updated_at,
    }
  }

  pub fn apply_to(&self, resident: &mut Resident) {
    if let Some(category) = &self.category {
      resident.category = category.clone();
    }
    if let Some(note) = &self.note {
      resident.note = note.clone();
    }
    if let Some(birth_date) = self.birth_date {
      resident.birth_date = birth_date;
    }
    resident.updated_at = Some(self.updated_at);
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn deserialises_stored_document() {
    let doc = json!({
      "id": "abc123",
      "nama": "Siti Aminah",
      "jenis-kelamin": "Perempuan",
      "kategori": "Lahir",
      "keterangan": "lahir di puskesmas",
      "tanggal-lahir": "2023-02-01",
      "umur": "0",
      "tanggal": { "seconds": 1700000000, "nanoseconds": 5 },
      "tanggal-update": { "seconds": 1700000100, "nanoseconds": 0 },
    });
    let r: Resident = serde_json::from_value(doc).unwrap();
    assert_eq!(r.id.as_str(), "abc123");
    assert_eq!(r.gender, Gender::Female);
    assert_eq!(r.category, Category::Birth);
    assert_eq!(r.birth_date, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
    assert_eq!(r.updated_seconds(), 1700000100);
  }

  #[test]
  fn missing_update_timestamp_reads_as_zero() {
    let doc = json!({
      "id": "x",
      "nama": "Budi",
      "jenis-kelamin": "Laki-laki",
      "kategori": "Penduduk Masuk",
      "tanggal-lahir": "1990-01-01",
    });
    let r: Resident = serde_json::from_value(doc).unwrap();
    assert_eq!(r.updated_at, None);
    assert_eq!(r.updated_seconds(), 0);
    assert_eq!(r.note, "");
  }

  #[test]
  fn unknown_labels_are_preserved() {
    let g = Gender::from("L".to_string());
    assert_eq!(g, Gender::Unrecognized("L".into()));
    assert_eq!(String::from(g), "L");

    let c = Category::from("Pindah".to_string());
    assert!(!c.is_recognized());
    assert!(c.is_active());
  }

  #[test]
  fn only_death_and_departure_are_inactive() {
    assert!(Category::IncomingResident.is_active());
    assert!(Category::Birth.is_active());
    assert!(!Category::Death.is_active());
    assert!(!Category::OutgoingResident.is_active());
  }

  #[test]
  fn patch_serialises_only_present_fields() {
    let patch = ResidentPatch {
      category: Some(Category::Death),
      ..ResidentPatch::touch(Timestamp::from_seconds(42))
    };
    let v = serde_json::to_value(&patch).unwrap();
    assert_eq!(
      v,
      json!({
        "kategori": "Mati",
        "tanggal-update": { "seconds": 42, "nanoseconds": 0 },
      })
    );
  }
}
