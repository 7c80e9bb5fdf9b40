//! Error types for `duta-core`.

use thiserror::Error;

/// Boxed error coming back from a [`crate::store::ResidentStore`] backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("invalid birth date: {0:?}")]
  InvalidBirthDate(String),

  #[error("field {0:?} cannot be edited")]
  UnknownField(String),

  #[error("invalid value for {field}: {value:?}")]
  InvalidValue { field: &'static str, value: String },

  #[error("no edit in progress")]
  NoEditInProgress,

  #[error("failed to fetch residents: {0}")]
  FetchFailed(#[source] BoxError),

  #[error("failed to create resident: {0}")]
  CreateFailed(#[source] BoxError),

  #[error("failed to update resident: {0}")]
  UpdateFailed(#[source] BoxError),
}

impl Error {
  /// True for errors raised by input validation, before any store call.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::MissingField(_)
        | Self::InvalidBirthDate(_)
        | Self::UnknownField(_)
        | Self::InvalidValue { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
