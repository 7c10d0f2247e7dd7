//! Runtime wiring for the census HTTP server.
//!
//! Loads [`ServerConfig`] and assembles the top-level [`Router`]. The binary
//! in `main.rs` opens the store, builds the enrichment client and serves.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{BoxError, Router, error_handling::HandleErrorLayer};
use census_api::ApiError;
use census_core::{
  enrich::EnrichmentProvider,
  service::PersonService,
  store::PersonStore,
};
use census_enrich::EnrichConfig;
use config::{
  Config, ConfigError, Environment, File,
  builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;
use tower::{ServiceBuilder, timeout::error::Elapsed};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered as built-in defaults, then the TOML file, then `CENSUS_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub request_timeout_secs: u64,
  pub age_api_url:          String,
  pub gender_api_url:       String,
  pub nationality_api_url:  String,
}

impl ServerConfig {
  /// A config builder preloaded with every default.
  pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let enrich = EnrichConfig::default();
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080_i64)?
      .set_default("store_path", "census.sqlite3")?
      .set_default("request_timeout_secs", 60_i64)?
      .set_default("age_api_url", enrich.age_url)?
      .set_default("gender_api_url", enrich.gender_url)?
      .set_default("nationality_api_url", enrich.nationality_url)
  }

  /// Load from `path` (optional) and the environment.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    Self::builder()?
      .add_source(File::from(path.into()).required(false))
      .add_source(Environment::with_prefix("CENSUS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn enrich_config(&self) -> EnrichConfig {
    EnrichConfig {
      age_url:         self.age_api_url.clone(),
      gender_url:      self.gender_api_url.clone(),
      nationality_url: self.nationality_api_url.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Mount the API under `/api` with request tracing and an inbound timeout.
///
/// A request still running at the deadline is dropped, along with any
/// lookups or store calls it was awaiting, and answered with a 408 in the
/// usual `{"error": ...}` envelope.
pub fn router<S, P>(service: Arc<PersonService<S, P>>, timeout: Duration) -> Router
where
  S: PersonStore + 'static,
  P: EnrichmentProvider + 'static,
{
  Router::new()
    .nest("/api", census_api::api_router(service))
    .layer(
      ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(timeout),
    )
    .layer(TraceLayer::new_for_http())
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
  if err.is::<Elapsed>() {
    ApiError::Timeout
  } else {
    ApiError::Internal(err.to_string())
  }
}
