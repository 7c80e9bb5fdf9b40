//! The "add resident" form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  age::{age_on, parse_birth_date},
  resident::{Category, Gender, NewResident, ResidentId, Timestamp},
  store::ResidentStore,
};

/// Raw form input, keyed like the stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeForm {
  #[serde(rename = "nama")]
  pub name:       String,
  #[serde(rename = "jenis-kelamin")]
  pub gender:     Gender,
  #[serde(rename = "kategori")]
  pub category:   Category,
  #[serde(rename = "keterangan")]
  pub note:       String,
  /// `YYYY-MM-DD`, as produced by a date input.
  #[serde(rename = "tanggal-lahir")]
  pub birth_date: String,
}

impl IntakeForm {
  pub fn new() -> Self { Self::default() }

  /// Back to an empty form with the default gender and category.
  pub fn reset(&mut self) { *self = Self::default(); }

  /// Check the required fields and build the record to store.
  pub fn validate(&self, today: NaiveDate, now: Timestamp) -> Result<NewResident> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("nama"));
    }
    if self.note.trim().is_empty() {
      return Err(Error::MissingField("keterangan"));
    }
    if self.birth_date.trim().is_empty() {
      return Err(Error::MissingField("tanggal-lahir"));
    }
    if !self.gender.is_recognized() {
      return Err(Error::InvalidValue {
        field: "jenis-kelamin",
        value: self.gender.as_str().to_owned(),
      });
    }
    if !self.category.is_recognized() {
      return Err(Error::InvalidValue {
        field: "kategori",
        value: self.category.as_str().to_owned(),
      });
    }
    let birth_date = parse_birth_date(&self.birth_date)?;

    Ok(NewResident {
      name: self.name.clone(),
      gender: self.gender.clone(),
      category: self.category.clone(),
      note: self.note.clone(),
      birth_date,
      age_at_creation: age_on(birth_date, today).to_string(),
      created_at: now,
      updated_at: now,
    })
  }

  /// Validate and create the record.
  ///
  /// Invalid input is rejected before the store is called. On success the
  /// form resets; on a store failure the entered values are kept.
  pub async fn submit<S>(&mut self, store: &S, today: NaiveDate) -> Result<ResidentId>
  where
    S: ResidentStore,
  {
    let record = self.validate(today, Timestamp::now())?;
    let id = store
      .create(record)
      .await
      .map_err(|e| Error::CreateFailed(Box::new(e)))?;
    self.reset();
    Ok(id)
  }
}
