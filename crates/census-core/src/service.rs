//! [`PersonService`] — validation, enrichment and existence checks in front
//! of a [`PersonStore`].

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  enrich::{EnrichmentProvider, enrich},
  field::PersonPatch,
  page::Page,
  person::{NewPerson, Person},
  store::{PersonQuery, PersonStore},
};

/// Application service shared by every request handler.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
pub struct PersonService<S, P> {
  store:    S,
  provider: P,
}

fn store_error<E>(op: &'static str) -> impl FnOnce(E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  move |e| Error::Store { op, source: Box::new(e) }
}

impl<S, P> PersonService<S, P>
where
  S: PersonStore,
  P: EnrichmentProvider,
{
  pub fn new(store: S, provider: P) -> Self { Self { store, provider } }

  pub fn store(&self) -> &S { &self.store }

  /// Validate `input`, enrich it by name and persist the result.
  ///
  /// Any lookup failure aborts before the store is touched.
  pub async fn create(&self, input: NewPerson) -> Result<Person> {
    input.validate()?;

    let enrichment = enrich(&self.provider, &input.name)
      .await
      .map_err(|e| Error::Enrichment { name: input.name.clone(), source: Box::new(e) })?;

    let person = Person {
      id:          Uuid::new_v4(),
      patronymic:  input.patronymic(),
      name:        input.name,
      surname:     input.surname,
      age:         enrichment.age,
      gender:      enrichment.gender,
      nationality: enrichment.nationality,
      created_at:  Utc::now(),
    };

    let person = self
      .store
      .insert_person(person)
      .await
      .map_err(store_error("insert person"))?;

    tracing::info!(person_id = %person.id, "created person");
    Ok(person)
  }

  pub async fn get(&self, id: Uuid) -> Result<Person> {
    self
      .store
      .get_person(id)
      .await
      .map_err(store_error("fetch person"))?
      .ok_or(Error::PersonNotFound(id))
  }

  pub async fn list(&self, query: &PersonQuery) -> Result<Page> {
    let persons = self
      .store
      .list_persons(query)
      .await
      .map_err(store_error("list persons"))?;
    Ok(Page::new(persons, query.limit))
  }

  /// Apply a partial update and return the updated person.
  pub async fn update(&self, id: Uuid, patch: PersonPatch) -> Result<Person> {
    let assignments = patch.into_assignments()?;
    self.get(id).await?;

    let updated = self
      .store
      .update_person(id, &assignments)
      .await
      .map_err(store_error("update person"))?;
    // Deleted between the existence check and the update.
    if !updated {
      return Err(Error::PersonNotFound(id));
    }

    tracing::info!(person_id = %id, fields = assignments.len(), "updated person");
    self.get(id).await
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.get(id).await?;

    let deleted = self
      .store
      .delete_person(id)
      .await
      .map_err(store_error("delete person"))?;
    if !deleted {
      return Err(Error::PersonNotFound(id));
    }

    tracing::info!(person_id = %id, "deleted person");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::{
    num::NonZeroU32,
    sync::{
      Mutex,
      atomic::{AtomicBool, AtomicUsize, Ordering},
    },
  };

  use super::*;
  use crate::field::{Assignments, Column, FieldValue};

  // ── Fakes ───────────────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("lookup failed: {0}")]
  struct LookupError(&'static str);

  struct FakeProvider {
    age:         Result<u8, &'static str>,
    gender:      Result<&'static str, &'static str>,
    nationality: Result<Option<&'static str>, &'static str>,
    calls:       AtomicUsize,
  }

  impl FakeProvider {
    fn alice() -> Self {
      Self {
        age:         Ok(30),
        gender:      Ok("female"),
        nationality: Ok(Some("US")),
        calls:       AtomicUsize::new(0),
      }
    }
  }

  impl EnrichmentProvider for FakeProvider {
    type Error = LookupError;

    async fn age(&self, _name: &str) -> Result<u8, LookupError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.age.map_err(LookupError)
    }

    async fn gender(&self, _name: &str) -> Result<String, LookupError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.gender.map(str::to_owned).map_err(LookupError)
    }

    async fn nationality(&self, _name: &str) -> Result<Option<String>, LookupError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self
        .nationality
        .map(|n| n.map(str::to_owned))
        .map_err(LookupError)
    }
  }

  #[derive(Debug, thiserror::Error)]
  #[error("store unavailable")]
  struct StoreDown;

  /// Vec-backed store. `vanish_on_write` drops the row right before a
  /// mutation, imitating a concurrent delete after the existence check.
  #[derive(Default)]
  struct FakeStore {
    rows:            Mutex<Vec<Person>>,
    vanish_on_write: AtomicBool,
    down:            AtomicBool,
  }

  impl FakeStore {
    fn check(&self) -> Result<(), StoreDown> {
      if self.down.load(Ordering::SeqCst) { Err(StoreDown) } else { Ok(()) }
    }

    fn vanish(&self, id: Uuid) {
      if self.vanish_on_write.load(Ordering::SeqCst) {
        self.rows.lock().unwrap().retain(|p| p.id != id);
      }
    }

    fn len(&self) -> usize { self.rows.lock().unwrap().len() }
  }

  impl PersonStore for FakeStore {
    type Error = StoreDown;

    async fn insert_person(&self, person: Person) -> Result<Person, StoreDown> {
      self.check()?;
      self.rows.lock().unwrap().push(person.clone());
      Ok(person)
    }

    async fn get_person(&self, id: Uuid) -> Result<Option<Person>, StoreDown> {
      self.check()?;
      Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_persons(&self, query: &PersonQuery) -> Result<Vec<Person>, StoreDown> {
      self.check()?;
      let mut rows = self.rows.lock().unwrap().clone();
      rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
      rows.truncate(query.limit.get() as usize);
      Ok(rows)
    }

    async fn update_person(
      &self,
      id: Uuid,
      assignments: &Assignments,
    ) -> Result<bool, StoreDown> {
      self.check()?;
      self.vanish(id);
      let mut rows = self.rows.lock().unwrap();
      let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
        return Ok(false);
      };
      for (column, value) in assignments.iter() {
        match (column, value) {
          (Column::Name, FieldValue::Text(v)) => row.name = v.clone(),
          (Column::Surname, FieldValue::Text(v)) => row.surname = v.clone(),
          (Column::Patronymic, FieldValue::Text(v)) => row.patronymic = Some(v.clone()),
          (Column::Age, FieldValue::Integer(v)) => row.age = *v as u8,
          (Column::Gender, FieldValue::Text(v)) => row.gender = v.clone(),
          (Column::Nationality, FieldValue::Text(v)) => row.nationality = Some(v.clone()),
          _ => unreachable!("assignment types are checked on construction"),
        }
      }
      Ok(true)
    }

    async fn delete_person(&self, id: Uuid) -> Result<bool, StoreDown> {
      self.check()?;
      self.vanish(id);
      let mut rows = self.rows.lock().unwrap();
      let before = rows.len();
      rows.retain(|p| p.id != id);
      Ok(rows.len() < before)
    }
  }

  fn service(provider: FakeProvider) -> PersonService<FakeStore, FakeProvider> {
    PersonService::new(FakeStore::default(), provider)
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_enriches_and_assigns_identity() {
    let svc = service(FakeProvider::alice());
    let start = Utc::now();

    let person = svc.create(NewPerson::new("Alice", "Liddell")).await.unwrap();

    assert_eq!(person.age, 30);
    assert_eq!(person.gender, "female");
    assert_eq!(person.nationality.as_deref(), Some("US"));
    assert!(!person.id.is_nil());
    assert!(person.created_at >= start);
    assert_eq!(svc.get(person.id).await.unwrap(), person);
  }

  #[tokio::test]
  async fn create_keeps_missing_nationality_as_none() {
    let provider = FakeProvider { nationality: Ok(None), ..FakeProvider::alice() };
    let svc = service(provider);

    let person = svc.create(NewPerson::new("Zyx", "Unknown")).await.unwrap();
    assert_eq!(person.nationality, None);
  }

  #[tokio::test]
  async fn failed_lookup_aborts_creation() {
    let provider = FakeProvider { gender: Err("gender api down"), ..FakeProvider::alice() };
    let svc = service(provider);

    let err = svc.create(NewPerson::new("Alice", "Liddell")).await.unwrap_err();

    assert!(matches!(err, Error::Enrichment { ref name, .. } if name == "Alice"));
    assert_eq!(svc.provider.calls.load(Ordering::SeqCst), 2, "nationality not queried");
    assert_eq!(svc.store().len(), 0, "nothing persisted");
  }

  #[tokio::test]
  async fn invalid_input_skips_enrichment() {
    let svc = service(FakeProvider::alice());

    let err = svc.create(NewPerson::new("Al1ce", "Liddell")).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(svc.provider.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn store_failure_is_reported_with_operation() {
    let svc = service(FakeProvider::alice());
    svc.store().down.store(true, Ordering::SeqCst);

    let err = svc.create(NewPerson::new("Alice", "Liddell")).await.unwrap_err();
    assert!(matches!(err, Error::Store { op: "insert person", .. }));
  }

  // ── Update / delete ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_changes_only_supplied_fields() {
    let svc = service(FakeProvider::alice());
    let person = svc.create(NewPerson::new("Alice", "Liddell")).await.unwrap();

    let patch = PersonPatch { surname: Some("Hargreaves".into()), age: Some(31), ..Default::default() };
    let updated = svc.update(person.id, patch).await.unwrap();

    assert_eq!(updated.surname, "Hargreaves");
    assert_eq!(updated.age, 31);
    assert_eq!(updated.name, person.name);
    assert_eq!(updated.created_at, person.created_at);
  }

  #[tokio::test]
  async fn update_with_invalid_age_never_reaches_storage() {
    let svc = service(FakeProvider::alice());
    svc.store().down.store(true, Ordering::SeqCst);

    let patch = PersonPatch { age: Some(150), ..Default::default() };
    let err = svc.update(Uuid::new_v4(), patch).await.unwrap_err();

    assert!(matches!(err, Error::InvalidField { field: "age", .. }));
  }

  #[tokio::test]
  async fn update_missing_person_is_not_found() {
    let svc = service(FakeProvider::alice());
    let id = Uuid::new_v4();

    let patch = PersonPatch { name: Some("Bob".into()), ..Default::default() };
    let err = svc.update(id, patch).await.unwrap_err();
    assert!(matches!(err, Error::PersonNotFound(missing) if missing == id));
  }

  #[tokio::test]
  async fn delete_missing_person_is_not_found() {
    let svc = service(FakeProvider::alice());
    let id = Uuid::new_v4();

    let err = svc.delete(id).await.unwrap_err();
    assert!(matches!(err, Error::PersonNotFound(missing) if missing == id));
  }

  #[tokio::test]
  async fn delete_removes_person() {
    let svc = service(FakeProvider::alice());
    let person = svc.create(NewPerson::new("Alice", "Liddell")).await.unwrap();

    svc.delete(person.id).await.unwrap();
    assert!(matches!(svc.get(person.id).await, Err(Error::PersonNotFound(_))));
  }

  #[tokio::test]
  async fn row_vanishing_after_check_is_not_found() {
    let svc = service(FakeProvider::alice());
    let person = svc.create(NewPerson::new("Alice", "Liddell")).await.unwrap();
    svc.store().vanish_on_write.store(true, Ordering::SeqCst);

    let err = svc.delete(person.id).await.unwrap_err();
    assert!(matches!(err, Error::PersonNotFound(_)));
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn full_page_carries_next_cursor() {
    let svc = service(FakeProvider::alice());
    for name in ["Alice", "Bob", "Carol"] {
      svc.create(NewPerson::new(name, "Liddell")).await.unwrap();
    }

    let limit = NonZeroU32::new(2).unwrap();
    let page = svc.list(&PersonQuery::new(limit)).await.unwrap();
    assert_eq!(page.persons.len(), 2);
    let last = page.persons.last().unwrap();
    let cursor = page.next_cursor.unwrap();
    assert_eq!(cursor.person_id, last.id);
    assert_eq!(cursor.created_at, last.created_at);

    let limit = NonZeroU32::new(5).unwrap();
    let page = svc.list(&PersonQuery::new(limit)).await.unwrap();
    assert_eq!(page.persons.len(), 3);
    assert!(page.next_cursor.is_none());
  }
}
