//! Dashboard aggregation over the full resident list.
//!
//! Every count is recomputed from scratch on each call. Ages are derived from
//! `birth_date` against the supplied `today`; the stored `age_at_creation`
//! is never consulted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  age::age_on,
  resident::{Category, Gender, Resident},
};

// ─── Age buckets ─────────────────────────────────────────────────────────────

/// A named, inclusive age range. `max: None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBucket {
  pub label: &'static str,
  pub min:   i32,
  pub max:   Option<i32>,
}

impl AgeBucket {
  pub fn contains(&self, age: i32) -> bool {
    age >= self.min && self.max.is_none_or(|max| age <= max)
  }
}

/// Dashboard age ranges.
///
/// Age 12 falls in no bucket. This matches the figures the village office has
/// always published and awaits product sign-off before it changes.
pub const AGE_BUCKETS: [AgeBucket; 6] = [
  AgeBucket { label: "0-11", min: 0, max: Some(11) },
  AgeBucket { label: "13-17", min: 13, max: Some(17) },
  AgeBucket { label: "18-25", min: 18, max: Some(25) },
  AgeBucket { label: "26-35", min: 26, max: Some(35) },
  AgeBucket { label: "36-45", min: 36, max: Some(45) },
  AgeBucket { label: "46+", min: 46, max: None },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketCount {
  #[serde(flatten)]
  pub bucket: AgeBucket,
  pub count:  usize,
}

// ─── Tallies ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
  pub male:   usize,
  pub female: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
  pub incoming: usize,
  pub outgoing: usize,
  pub birth:    usize,
  pub death:    usize,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
  pub total_records:    usize,
  /// Records that are neither deaths nor departures.
  pub active_residents: usize,
  pub age_groups:       Vec<BucketCount>,
  pub gender:           GenderCounts,
  pub category:         CategoryCounts,
}

impl Statistics {
  pub fn compute(records: &[Resident], today: NaiveDate) -> Self {
    let active_residents =
      records.iter().filter(|r| r.category.is_active()).count();

    let ages: Vec<i32> =
      records.iter().map(|r| age_on(r.birth_date, today)).collect();
    let age_groups = AGE_BUCKETS
      .iter()
      .map(|bucket| BucketCount {
        bucket: *bucket,
        count:  ages.iter().filter(|age| bucket.contains(**age)).count(),
      })
      .collect();

    let count_gender =
      |g: Gender| records.iter().filter(|r| r.gender == g).count();
    let gender = GenderCounts {
      male:   count_gender(Gender::Male),
      female: count_gender(Gender::Female),
    };

    let count_category =
      |c: Category| records.iter().filter(|r| r.category == c).count();
    let category = CategoryCounts {
      incoming: count_category(Category::IncomingResident),
      outgoing: count_category(Category::OutgoingResident),
      birth:    count_category(Category::Birth),
      death:    count_category(Category::Death),
    };

    Self {
      total_records: records.len(),
      active_residents,
      age_groups,
      gender,
      category,
    }
  }

  /// The all-zero dashboard shown when the collection could not be loaded.
  pub fn empty(today: NaiveDate) -> Self { Self::compute(&[], today) }
}
