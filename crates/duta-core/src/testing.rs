//! In-memory store used by the unit tests in this crate.

use std::sync::{
  Mutex,
  atomic::{AtomicBool, AtomicUsize, Ordering},
};

use chrono::NaiveDate;

use crate::{
  resident::{
    Category, Gender, NewResident, Resident, ResidentId, ResidentPatch,
    Timestamp,
  },
  store::ResidentStore,
};

#[derive(Debug, thiserror::Error)]
pub enum FakeError {
  #[error("store offline")]
  Offline,
  #[error("no document {0}")]
  Missing(ResidentId),
}

#[derive(Default)]
pub struct FakeStore {
  docs:      Mutex<Vec<Resident>>,
  offline:   AtomicBool,
  calls:     AtomicUsize,
}

impl FakeStore {
  pub fn with(docs: Vec<Resident>) -> Self {
    Self { docs: Mutex::new(docs), ..Self::default() }
  }

  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  pub fn docs(&self) -> Vec<Resident> { self.docs.lock().unwrap().clone() }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  fn enter(&self) -> Result<(), FakeError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.offline.load(Ordering::SeqCst) {
      return Err(FakeError::Offline);
    }
    Ok(())
  }
}

impl ResidentStore for FakeStore {
  type Error = FakeError;

  async fn fetch_all(&self) -> Result<Vec<Resident>, FakeError> {
    self.enter()?;
    Ok(self.docs())
  }

  async fn create(&self, input: NewResident) -> Result<ResidentId, FakeError> {
    self.enter()?;
    let mut docs = self.docs.lock().unwrap();
    let id = ResidentId::new(format!("doc{}", docs.len()));
    docs.push(input.into_resident(id.clone()));
    Ok(id)
  }

  async fn update(
    &self,
    id: ResidentId,
    patch: ResidentPatch,
  ) -> Result<(), FakeError> {
    self.enter()?;
    let mut docs = self.docs.lock().unwrap();
    let doc = docs
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or(FakeError::Missing(id))?;
    patch.apply_to(doc);
    Ok(())
  }
}

pub fn resident(id: &str, name: &str, updated: i64) -> Resident {
  Resident {
    id: ResidentId::new(id),
    name: name.into(),
    gender: Gender::Female,
    category: Category::IncomingResident,
    note: "pindahan".into(),
    birth_date: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
    age_at_creation: "28".into(),
    created_at: Timestamp::from_seconds(updated),
    updated_at: Some(Timestamp::from_seconds(updated)),
  }
}
