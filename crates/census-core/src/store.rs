//! The `PersonStore` trait and supporting query type.
//!
//! The trait is implemented by storage backends (e.g. `census-store-sqlite`).
//! [`PersonService`](crate::service::PersonService) depends on this
//! abstraction, not on any concrete backend.

use std::{future::Future, num::NonZeroU32};

use uuid::Uuid;

use crate::{
  field::{Assignments, PersonFilter},
  page::Cursor,
  person::Person,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PersonStore::list_persons`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonQuery {
  /// Equality filters, AND-combined. Empty matches every person.
  pub filter: PersonFilter,
  /// Resume strictly after this row; `None` starts at the newest person.
  pub cursor: Option<Cursor>,
  pub limit:  NonZeroU32,
}

impl PersonQuery {
  pub fn new(limit: NonZeroU32) -> Self {
    Self { filter: PersonFilter::default(), cursor: None, limit }
  }

  pub fn with_filter(mut self, filter: PersonFilter) -> Self {
    self.filter = filter;
    self
  }

  pub fn with_cursor(mut self, cursor: Option<Cursor>) -> Self {
    self.cursor = cursor;
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a person store backend.
///
/// Each method is a single statement; nothing spans a transaction. All
/// methods return `Send` futures so the trait can be used behind `axum`.
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a fully-populated person (id and timestamp already assigned).
  fn insert_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// One page of persons ordered by `(created_at DESC, id DESC)`.
  fn list_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Apply `assignments` to the person with `id`.
  ///
  /// Returns `false` if no row matched.
  fn update_person<'a>(
    &'a self,
    id: Uuid,
    assignments: &'a Assignments,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete the person with `id`. Returns `false` if no row matched.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
