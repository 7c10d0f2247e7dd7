//! SQLite backend for the census person registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Listing and update statements are
//! assembled by the [`query`] module.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod query;

pub use error::{Error, Result};
pub use store::SqliteStore;
