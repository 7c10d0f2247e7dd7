//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed nanosecond
//! width, so lexicographic order in SQL equals chronological order. UUIDs are
//! stored as hyphenated lowercase strings, whose lexicographic order equals
//! `Uuid`'s byte order.

use chrono::{DateTime, SecondsFormat, Utc};
use census_core::person::Person;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ────────────────────────────────────────────────────────────────

/// Column order shared by every `SELECT` that produces a [`RawPerson`].
pub const PERSON_COLUMNS: &str =
  "id, name, surname, patronymic, age, gender, nationality, created_at";

/// A `persons` row as read from SQLite, before decoding.
pub struct RawPerson {
  pub id:          String,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  Option<String>,
  pub age:         i64,
  pub gender:      String,
  pub nationality: Option<String>,
  pub created_at:  String,
}

impl RawPerson {
  /// Read a row selected with [`PERSON_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPerson {
      id:          row.get(0)?,
      name:        row.get(1)?,
      surname:     row.get(2)?,
      patronymic:  row.get(3)?,
      age:         row.get(4)?,
      gender:      row.get(5)?,
      nationality: row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      surname:     self.surname,
      patronymic:  self.patronymic,
      age:         u8::try_from(self.age).map_err(|_| Error::AgeOutOfRange(self.age))?,
      gender:      self.gender,
      nationality: self.nationality,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
