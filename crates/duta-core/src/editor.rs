//! Single-record edit session for the resident table.
//!
//! Only category, note and birth date are editable. Name, gender, identifier
//! and creation time stay as they were recorded at intake.

use chrono::NaiveDate;

use crate::{
  Error, Result,
  age::parse_birth_date,
  resident::{Category, Resident, ResidentPatch, Timestamp},
  store::ResidentStore,
  table::ResidentTable,
};

/// One change to an editable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditField {
  Category(Category),
  Note(String),
  BirthDate(NaiveDate),
}

impl EditField {
  /// Build a change from a wire key and its raw form value.
  pub fn parse(key: &str, value: &str) -> Result<Self> {
    match key {
      "kategori" => {
        let category = Category::from(value.to_owned());
        if !category.is_recognized() {
          return Err(Error::InvalidValue {
            field: "kategori",
            value: value.to_owned(),
          });
        }
        Ok(Self::Category(category))
      }
      "keterangan" => Ok(Self::Note(value.to_owned())),
      "tanggal-lahir" => parse_birth_date(value).map(Self::BirthDate),
      other => Err(Error::UnknownField(other.to_owned())),
    }
  }
}

/// Holds at most one working copy of a record.
#[derive(Debug, Clone, Default)]
pub struct Editor {
  slot: Option<Resident>,
}

impl Editor {
  pub fn new() -> Self { Self::default() }

  /// Start editing a copy of `record`. Any unsaved edit is dropped.
  pub fn begin(&mut self, record: &Resident) { self.slot = Some(record.clone()); }

  /// The working copy, if an edit is in progress.
  pub fn editing(&self) -> Option<&Resident> { self.slot.as_ref() }

  pub fn change(&mut self, field: EditField) -> Result<()> {
    let draft = self.slot.as_mut().ok_or(Error::NoEditInProgress)?;
    match field {
      EditField::Category(category) => draft.category = category,
      EditField::Note(note) => draft.note = note,
      EditField::BirthDate(date) => draft.birth_date = date,
    }
    Ok(())
  }

  /// Discard the working copy without writing.
  pub fn cancel(&mut self) { self.slot = None; }

  /// Write the working copy's editable fields with a fresh `updated_at`.
  ///
  /// On success the record is replaced in `table` and the slot is cleared.
  /// On failure the slot keeps the working copy so the save can be retried.
  pub async fn commit<S>(
    &mut self,
    store: &S,
    table: &mut ResidentTable,
  ) -> Result<Resident>
  where
    S: ResidentStore,
  {
    let draft = self.slot.clone().ok_or(Error::NoEditInProgress)?;
    let patch = ResidentPatch::from_draft(&draft, Timestamp::now());

    store
      .update(draft.id.clone(), patch.clone())
      .await
      .map_err(|e| Error::UpdateFailed(Box::new(e)))?;

    let mut saved = draft;
    patch.apply_to(&mut saved);
    table.replace(saved.clone());
    self.slot = None;
    Ok(saved)
  }
}
