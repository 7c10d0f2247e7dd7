//! Keyset pagination types.
//!
//! Listings are ordered by `(created_at DESC, id DESC)`. A [`Cursor`] names
//! the last row a client has seen; the next page holds only rows strictly
//! after it in that order.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, person::Person};

/// The sort key of the last row of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
  pub person_id:  Uuid,
  pub created_at: DateTime<Utc>,
}

impl Cursor {
  /// The cursor pointing just past `person`.
  pub fn after(person: &Person) -> Self {
    Self { person_id: person.id, created_at: person.created_at }
  }

  /// Combine the two halves of a cursor; both or neither must be present.
  pub fn from_parts(
    person_id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
  ) -> Result<Option<Self>> {
    match (person_id, created_at) {
      (Some(person_id), Some(created_at)) => Ok(Some(Self { person_id, created_at })),
      (None, None) => Ok(None),
      (Some(_), None) => Err(Error::InvalidCursor(
        "person_id was given without created_at".into(),
      )),
      (None, Some(_)) => Err(Error::InvalidCursor(
        "created_at was given without person_id".into(),
      )),
    }
  }

  /// Parse the raw query-string halves. Empty strings count as absent.
  ///
  /// `created_at` must be RFC 3339, e.g. `2024-05-01T12:30:00.123456Z`.
  pub fn parse(person_id: Option<&str>, created_at: Option<&str>) -> Result<Option<Self>> {
    let person_id = person_id
      .filter(|s| !s.is_empty())
      .map(|s| {
        Uuid::parse_str(s)
          .map_err(|e| Error::InvalidCursor(format!("person_id {s:?}: {e}")))
      })
      .transpose()?;

    let created_at = created_at
      .filter(|s| !s.is_empty())
      .map(|s| {
        DateTime::parse_from_rfc3339(s)
          .map(|dt| dt.with_timezone(&Utc))
          .map_err(|e| Error::InvalidCursor(format!("created_at {s:?}: {e}")))
      })
      .transpose()?;

    Self::from_parts(person_id, created_at)
  }
}

/// Parse the required page size; it must be a positive integer.
pub fn parse_limit(raw: Option<&str>) -> Result<NonZeroU32> {
  let raw = raw
    .filter(|s| !s.is_empty())
    .ok_or_else(|| Error::InvalidLimit("limit is required".into()))?;
  raw
    .trim()
    .parse::<NonZeroU32>()
    .map_err(|_| Error::InvalidLimit(format!("{raw:?} is not a positive integer")))
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
  pub persons:     Vec<Person>,
  /// Cursor for the following page; `None` once a short page signals the end.
  pub next_cursor: Option<Cursor>,
}

impl Page {
  pub fn new(persons: Vec<Person>, limit: NonZeroU32) -> Self {
    let next_cursor = if persons.len() >= limit.get() as usize {
      persons.last().map(Cursor::after)
    } else {
      None
    };
    Self { persons, next_cursor }
  }
}
