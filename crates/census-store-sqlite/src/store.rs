//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].

use std::{path::Path, time::Instant};

use census_core::{
  field::Assignments,
  person::Person,
  store::{PersonQuery, PersonStore},
};
use rusqlite::{OptionalExtension as _, params_from_iter};
use uuid::Uuid;

use crate::{
  Result,
  encode::{PERSON_COLUMNS, RawPerson, encode_dt, encode_uuid},
  query::{self, Statement},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the connection, waiting for queued statements to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement that changes rows; returns the affected row count.
  async fn execute(&self, stmt: Statement) -> Result<usize> {
    let Statement { sql, params } = stmt;
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params_from_iter(params.iter()))?))
      .await?;
    Ok(changed)
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_person(&self, person: Person) -> Result<Person> {
    let started = Instant::now();

    let id_str      = encode_uuid(person.id);
    let at_str      = encode_dt(person.created_at);
    let name        = person.name.clone();
    let surname     = person.surname.clone();
    let patronymic  = person.patronymic.clone();
    let age         = i64::from(person.age);
    let gender      = person.gender.clone();
    let nationality = person.nationality.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (
             id, name, surname, patronymic, age, gender, nationality, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            name,
            surname,
            patronymic,
            age,
            gender,
            nationality,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(person_id = %person.id, elapsed = ?started.elapsed(), "inserted person");
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let started = Instant::now();
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    tracing::debug!(person_id = %id, elapsed = ?started.elapsed(), "selected person by id");
    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    let started = Instant::now();
    let Statement { sql, params } = query::select_page(query);
    tracing::debug!(%sql, "built listing query");

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(
      rows = raws.len(),
      filters = query.filter.len(),
      elapsed = ?started.elapsed(),
      "listed persons"
    );
    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update_person(&self, id: Uuid, assignments: &Assignments) -> Result<bool> {
    let started = Instant::now();
    let stmt = query::update_by_id(id, assignments);
    tracing::debug!(sql = %stmt.sql, "built update query");

    let changed = self.execute(stmt).await?;

    tracing::debug!(person_id = %id, changed, elapsed = ?started.elapsed(), "updated person");
    Ok(changed > 0)
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let started = Instant::now();
    let stmt = Statement {
      sql:    "DELETE FROM persons WHERE id = ?1".to_owned(),
      params: vec![rusqlite::types::Value::Text(encode_uuid(id))],
    };

    let changed = self.execute(stmt).await?;

    tracing::debug!(person_id = %id, changed, elapsed = ?started.elapsed(), "deleted person");
    Ok(changed > 0)
  }
}
