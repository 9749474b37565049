//! Error type for `tally-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tally_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A text column held a value outside its enum.
  #[error("unknown {column} value: {value:?}")]
  UnknownVariant { column: &'static str, value: String },

  /// An integer column held a value outside its domain.
  #[error("{column} out of range: {value}")]
  OutOfRange { column: &'static str, value: i64 },

  /// A version too large for an SQLite INTEGER.
  #[error("version {0} does not fit in an INTEGER column")]
  VersionOverflow(u64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
