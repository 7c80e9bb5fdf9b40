//! Age arithmetic on calendar dates.

use chrono::{Datelike as _, Local, NaiveDate};

use crate::{Error, Result};

/// Wire format of `tanggal-lahir`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole years elapsed between `birth` and `today`.
///
/// Negative when `birth` lies in the future; callers validate upstream.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
  let mut age = today.year() - birth.year();
  if (today.month(), today.day()) < (birth.month(), birth.day()) {
    age -= 1;
  }
  age
}

/// Today's date in the server's local time zone.
pub fn today() -> NaiveDate { Local::now().date_naive() }

pub fn parse_birth_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|_| Error::InvalidBirthDate(s.to_owned()))
}
