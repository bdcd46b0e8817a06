//! Error types for `tierheim-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::enclosure::EnclosureId;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or out of range. The caller should re-prompt.
  #[error("invalid {field}: {reason}")]
  Validation {
    field:  &'static str,
    reason: String,
  },

  #[error(
    "animal already exists: {name} ({species}), born {}",
    describe_birth(.birth_date)
  )]
  DuplicateRecord {
    name:       String,
    species:    String,
    birth_date: Option<NaiveDate>,
  },

  #[error("enclosure {enclosure_id} is full ({occupancy}/{capacity})")]
  CapacityExceeded {
    enclosure_id: EnclosureId,
    capacity:     u32,
    occupancy:    u32,
  },

  #[error("enclosure not found: {0}")]
  EnclosureNotFound(EnclosureId),

  /// The backing store failed. Surfaced verbatim, never retried here.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Validation { field, reason: reason.into() }
  }

  pub(crate) fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }

  /// `true` for the expected, caller-recoverable conditions; `false` only for
  /// [`Error::Storage`].
  pub fn is_domain(&self) -> bool { !matches!(self, Self::Storage(_)) }
}

fn describe_birth(birth_date: &Option<NaiveDate>) -> String {
  birth_date.map_or_else(|| "unknown".to_owned(), |d| d.to_string())
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
