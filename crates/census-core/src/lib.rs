//! Core types and trait definitions for the census person registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::PersonStore`], enrichment clients
//! implement [`enrich::EnrichmentProvider`], and [`service::PersonService`]
//! ties the two together.

// Native `async fn` in traits; the trait methods spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod enrich;
pub mod error;
pub mod field;
pub mod page;
pub mod person;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
