//! Dynamic statement assembly for listings and partial updates.
//!
//! Column identifiers come only from [`Column::as_str`]; every value is bound
//! through a numbered `?N` placeholder and travels in [`Statement::params`].

use census_core::{
  field::{Assignments, Column, FieldValue},
  store::PersonQuery,
};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::encode::{PERSON_COLUMNS, encode_dt, encode_uuid};

// ─── Predicate builder ────────────────────────────────────────────────────────

/// `column = ?N` fragments with their bound values, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
  pub fragments:  Vec<String>,
  pub values:     Vec<Value>,
  /// First placeholder index not used by this predicate.
  pub next_index: usize,
}

/// Build one `column = ?N` fragment per entry, numbering placeholders from
/// `first_index` so the result can follow other bound parameters.
///
/// An empty input yields no fragments and `next_index == first_index`.
pub fn predicate<'a>(
  fields: impl IntoIterator<Item = (Column, &'a FieldValue)>,
  first_index: usize,
) -> Predicate {
  let mut fragments = Vec::new();
  let mut values = Vec::new();
  let mut next_index = first_index;

  for (column, value) in fields {
    fragments.push(format!("{} = ?{next_index}", column.as_str()));
    values.push(sql_value(value));
    next_index += 1;
  }

  Predicate { fragments, values, next_index }
}

fn sql_value(value: &FieldValue) -> Value {
  match value {
    FieldValue::Text(s) => Value::Text(s.clone()),
    FieldValue::Integer(n) => Value::Integer(*n),
  }
}

// ─── Statements ───────────────────────────────────────────────────────────────

/// SQL text plus the values for its placeholders, `?1` first.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<Value>,
}

/// Compose the keyset-paginated listing for `query`.
///
/// The cursor condition is a row-value comparison on `(created_at, id)`,
/// matching `ORDER BY created_at DESC, id DESC`. It and the filter
/// conditions are AND-combined; `WHERE` is emitted only when at least one
/// condition exists.
pub fn select_page(query: &PersonQuery) -> Statement {
  let mut clauses = Vec::new();
  let mut params = Vec::new();
  let mut next_index = 1;

  if let Some(cursor) = &query.cursor {
    clauses.push(format!(
      "(created_at, id) < (?{}, ?{})",
      next_index,
      next_index + 1
    ));
    params.push(Value::Text(encode_dt(cursor.created_at)));
    params.push(Value::Text(encode_uuid(cursor.person_id)));
    next_index += 2;
  }

  let filter = predicate(query.filter.iter(), next_index);
  clauses.extend(filter.fragments);
  params.extend(filter.values);

  let mut sql = format!("SELECT {PERSON_COLUMNS} FROM persons");
  if !clauses.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(&clauses.join(" AND "));
  }
  sql.push_str(&format!(
    " ORDER BY created_at DESC, id DESC LIMIT ?{}",
    filter.next_index
  ));
  params.push(Value::Integer(i64::from(query.limit.get())));

  Statement { sql, params }
}

/// Compose `UPDATE persons SET ... WHERE id = ?N` for `assignments`.
pub fn update_by_id(id: Uuid, assignments: &Assignments) -> Statement {
  let set = predicate(assignments.iter(), 1);
  let sql = format!(
    "UPDATE persons SET {} WHERE id = ?{}",
    set.fragments.join(", "),
    set.next_index
  );
  let mut params = set.values;
  params.push(Value::Text(encode_uuid(id)));
  Statement { sql, params }
}
