//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/persons` | Body: `{"name","surname","patronymic"?}`; 201 + enriched person |
//! | `GET`    | `/persons` | `?limit` required; `person_id` + `created_at` cursor; filters `name,surname,age,gender,nationality` |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `PUT`    | `/persons/:id` | Body: any subset of the mutable fields |
//! | `DELETE` | `/persons/:id` | 204, or 404 if not found |

use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use census_core::{
  enrich::EnrichmentProvider,
  field::{Column, FieldValue, PersonFilter, PersonPatch},
  page::{Cursor, Page, parse_limit},
  person::{NewPerson, Person},
  service::PersonService,
  store::{PersonQuery, PersonStore},
};
use uuid::Uuid;

use crate::error::ApiError;

type Service<S, P> = State<Arc<PersonService<S, P>>>;

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("invalid person id {raw:?}: {e}")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// Build a [`PersonQuery`] from raw query-string pairs.
///
/// Filter keys are looked up from [`Column::FILTERABLE`]; any other key is
/// ignored.
pub fn query_from_params(params: &HashMap<String, String>) -> Result<PersonQuery, ApiError> {
  let get = |key: &str| params.get(key).map(String::as_str);

  let limit = parse_limit(get("limit"))?;
  let cursor = Cursor::parse(get("person_id"), get("created_at"))?;

  let mut filter = PersonFilter::new();
  for column in Column::FILTERABLE {
    if let Some(raw) = get(column.as_str()) {
      filter.insert(column, FieldValue::parse(column, raw)?)?;
    }
  }

  Ok(PersonQuery::new(limit).with_filter(filter).with_cursor(cursor))
}

/// `GET /persons?limit=<n>[&person_id=..&created_at=..][&name=..]...`
pub async fn list<S, P>(
  State(service): Service<S, P>,
  Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page>, ApiError>
where
  S: PersonStore,
  P: EnrichmentProvider,
{
  let query = query_from_params(&params)?;
  let page = service.list(&query).await?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons` — enrich by name and store.
pub async fn create<S, P>(
  State(service): Service<S, P>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
  P: EnrichmentProvider,
{
  let Json(input) = body?;
  let person = service.create(input).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S, P>(
  State(service): Service<S, P>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  P: EnrichmentProvider,
{
  let person = service.get(parse_id(&id)?).await?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/:id` — partial update; returns the updated person.
pub async fn update_one<S, P>(
  State(service): Service<S, P>,
  Path(id): Path<String>,
  body: Result<Json<PersonPatch>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  P: EnrichmentProvider,
{
  let id = parse_id(&id)?;
  let Json(patch) = body?;
  let person = service.update(id, patch).await?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id`
pub async fn delete_one<S, P>(
  State(service): Service<S, P>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
  P: EnrichmentProvider,
{
  service.delete(parse_id(&id)?).await?;
  Ok(StatusCode::NO_CONTENT)
}
