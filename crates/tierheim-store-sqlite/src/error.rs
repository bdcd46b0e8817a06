//! Error type for `tierheim-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A stored code (e.g. the `sex` column) is not one this crate writes.
  #[error("unknown {column} code: {value:?}")]
  UnknownCode {
    column: &'static str,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
