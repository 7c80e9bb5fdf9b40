//! The paginated resident table.
//!
//! Holds the full list sorted once on load, the current search query and the
//! current page. The filtered view is always re-derived from the full list,
//! never from a previous filter result.

use std::{cmp::Reverse, ops::RangeInclusive};

use serde::Serialize;

use crate::resident::Resident;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ResidentTable {
  records:  Vec<Resident>,
  filtered: Vec<Resident>,
  query:    String,
  /// 1-based. Not reset when the query changes.
  page:     usize,
}

impl ResidentTable {
  /// Sort `records` by most recent update first and show page 1 unfiltered.
  pub fn new(mut records: Vec<Resident>) -> Self {
    records.sort_by_key(|r| Reverse(r.updated_seconds()));
    Self {
      filtered: records.clone(),
      records,
      query: String::new(),
      page: 1,
    }
  }

  /// The full sorted list.
  pub fn records(&self) -> &[Resident] { &self.records }

  /// The records matching the current query, in sorted order.
  pub fn filtered(&self) -> &[Resident] { &self.filtered }

  pub fn query(&self) -> &str { &self.query }

  pub fn page(&self) -> usize { self.page }

  /// Case-insensitive substring match on the name. An empty query shows the
  /// full list.
  pub fn search(&mut self, query: &str) {
    self.query = query.to_owned();
    self.refilter();
  }

  fn refilter(&mut self) {
    if self.query.is_empty() {
      self.filtered = self.records.clone();
      return;
    }
    let needle = self.query.to_lowercase();
    self.filtered = self
      .records
      .iter()
      .filter(|r| r.name.to_lowercase().contains(&needle))
      .cloned()
      .collect();
  }

  pub fn total_pages(&self) -> usize { self.filtered.len().div_ceil(PAGE_SIZE) }

  pub fn page_numbers(&self) -> RangeInclusive<usize> { 1..=self.total_pages() }

  pub fn has_previous(&self) -> bool { self.page > 1 }

  pub fn has_next(&self) -> bool { self.page < self.total_pages() }

  /// Jump to `page`. Pages past the end are allowed and simply show no rows.
  pub fn set_page(&mut self, page: usize) { self.page = page.max(1); }

  pub fn next_page(&mut self) -> bool {
    if !self.has_next() {
      return false;
    }
    self.page += 1;
    true
  }

  pub fn previous_page(&mut self) -> bool {
    if !self.has_previous() {
      return false;
    }
    self.page -= 1;
    true
  }

  /// The rows on the current page.
  pub fn current_rows(&self) -> &[Resident] {
    let Some(start) = (self.page - 1).checked_mul(PAGE_SIZE) else {
      return &[];
    };
    if start >= self.filtered.len() {
      return &[];
    }
    let end = (start + PAGE_SIZE).min(self.filtered.len());
    &self.filtered[start..end]
  }

  /// Swap in `record` for the entry with the same identifier, keeping its
  /// position. Returns `false` if no such entry exists.
  pub fn replace(&mut self, record: Resident) -> bool {
    let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) else {
      return false;
    };
    *slot = record;
    self.refilter();
    true
  }

  pub fn view(&self) -> PageView {
    PageView {
      rows:          self.current_rows().to_vec(),
      query:         self.query.clone(),
      page:          self.page,
      total_pages:   self.total_pages(),
      total_matches: self.filtered.len(),
      page_numbers:  self.page_numbers().collect(),
      has_previous:  self.has_previous(),
      has_next:      self.has_next(),
    }
  }
}

/// Serializable snapshot of one rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
  pub rows:          Vec<Resident>,
  pub query:         String,
  pub page:          usize,
  pub total_pages:   usize,
  pub total_matches: usize,
  pub page_numbers:  Vec<usize>,
  pub has_previous:  bool,
  pub has_next:      bool,
}
