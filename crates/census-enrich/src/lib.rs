//! HTTP enrichment provider for census.
//!
//! [`HttpEnricher`] queries three name-prediction APIs shaped like
//! agify.io, genderize.io and nationalize.io (`GET <base>?name=<name>`) and
//! implements [`census_core::enrich::EnrichmentProvider`].

mod client;

pub mod error;

pub use client::{EnrichConfig, HttpEnricher};
pub use error::{Api, Error, Result};
