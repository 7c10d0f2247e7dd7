//! Error type for `census-enrich`.

use thiserror::Error;

/// Which of the three lookup APIs an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Api {
  Age,
  Gender,
  Nationality,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("{api} lookup request failed: {source}")]
  Request {
    api:    Api,
    #[source]
    source: reqwest::Error,
  },

  #[error("{api} lookup returned {status}")]
  Status {
    api:    Api,
    status: reqwest::StatusCode,
  },

  #[error("{api} lookup returned an undecodable body: {source}")]
  Decode {
    api:    Api,
    #[source]
    source: reqwest::Error,
  },

  /// The provider answered but has no prediction for the name.
  #[error("{api} lookup has no prediction for {name:?}")]
  NoPrediction {
    api:  Api,
    name: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
