//! JSON REST API for census.
//!
//! Exposes an axum [`Router`] backed by a [`PersonService`] over any
//! [`PersonStore`] and [`EnrichmentProvider`]. TLS, timeouts and request
//! tracing are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", census_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{Router, routing::get};
use census_core::{
  enrich::EnrichmentProvider,
  service::PersonService,
  store::PersonStore,
};

pub use error::ApiError;

/// Build the API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(service: Arc<PersonService<S, P>>) -> Router<()>
where
  S: PersonStore + 'static,
  P: EnrichmentProvider + 'static,
{
  Router::new()
    .route(
      "/persons",
      get(persons::list::<S, P>).post(persons::create::<S, P>),
    )
    .route(
      "/persons/{id}",
      get(persons::get_one::<S, P>)
        .put(persons::update_one::<S, P>)
        .delete(persons::delete_one::<S, P>),
    )
    .with_state(service)
}
