//! Error type for `techflow-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a value this build does not recognise.
  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },

  #[error("ticket number {0} is already taken")]
  DuplicateNumber(u32),

  #[error("ticket {0} already exists")]
  DuplicateId(uuid::Uuid),

  /// Imported numbers must lie in `1..u32::MAX` so creation can follow them.
  #[error("ticket number {0} is out of range")]
  NumberOutOfRange(u32),

  #[error("no ticket numbers left after {0}")]
  NumbersExhausted(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
