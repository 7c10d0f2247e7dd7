//! Error types for `census-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::field::Column;

/// Boxed error from a collaborator (store backend, enrichment client).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid {field}: {reason}")]
  InvalidField {
    field:  &'static str,
    reason: String,
  },

  #[error("invalid cursor: {0}")]
  InvalidCursor(String),

  #[error("invalid limit: {0}")]
  InvalidLimit(String),

  #[error("column {0} cannot be used as a filter")]
  UnfilterableColumn(Column),

  #[error("no fields to update")]
  EmptyUpdate,

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("enrichment failed for {name:?}: {source}")]
  Enrichment {
    name:   String,
    #[source]
    source: BoxError,
  },

  #[error("store error while trying to {op}: {source}")]
  Store {
    op:     &'static str,
    #[source]
    source: BoxError,
  },
}

impl Error {
  pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Error::InvalidField { field, reason: reason.into() }
  }

  /// `true` for errors caused by malformed client input.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Error::InvalidField { .. }
        | Error::InvalidCursor(_)
        | Error::InvalidLimit(_)
        | Error::UnfilterableColumn(_)
        | Error::EmptyUpdate
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
