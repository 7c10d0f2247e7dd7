//! Error type for `census-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored `age` that does not fit the entity's range.
  #[error("stored age out of range: {0}")]
  AgeOutOfRange(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
