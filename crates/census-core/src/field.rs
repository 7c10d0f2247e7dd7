//! Column allow-list and the column → value mappings built on top of it.
//!
//! Storage backends turn a [`PersonFilter`] or [`Assignments`] into SQL. The
//! only column identifiers that can ever reach a statement are the ones
//! listed in [`Column`]; values are always bound as parameters.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{Error, Result, validate};

// ─── Columns ─────────────────────────────────────────────────────────────────

/// A mutable column of the `persons` table.
///
/// The derived `Ord` fixes the enumeration order of every mapping keyed by
/// `Column`, and therefore the placeholder order of generated SQL.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  strum::Display,
  strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
  Name,
  Surname,
  Patronymic,
  Age,
  Gender,
  Nationality,
}

impl Column {
  /// Columns a listing may be filtered on, which double as the recognised
  /// query parameter names.
  pub const FILTERABLE: [Column; 5] = [
    Column::Name,
    Column::Surname,
    Column::Age,
    Column::Gender,
    Column::Nationality,
  ];

  /// The SQL identifier (and JSON / query-string key) for this column.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn is_filterable(self) -> bool { Self::FILTERABLE.contains(&self) }

  pub fn is_integer(self) -> bool { matches!(self, Column::Age) }
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// A value bound to a column placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(String),
  Integer(i64),
}

impl FieldValue {
  /// Parse a raw query-string value into the type `column` stores.
  pub fn parse(column: Column, raw: &str) -> Result<Self> {
    if column.is_integer() {
      raw
        .trim()
        .parse()
        .map(FieldValue::Integer)
        .map_err(|_| Error::invalid(column.as_str(), format!("{raw:?} is not an integer")))
    } else {
      Ok(FieldValue::Text(raw.to_owned()))
    }
  }

  fn matches_kind_of(&self, column: Column) -> bool {
    matches!(self, FieldValue::Integer(_)) == column.is_integer()
  }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self { FieldValue::Text(s) }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { FieldValue::Text(s.to_owned()) }
}

impl From<i64> for FieldValue {
  fn from(n: i64) -> Self { FieldValue::Integer(n) }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Equality filters for a listing. Empty means "match all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
  fields: BTreeMap<Column, FieldValue>,
}

impl PersonFilter {
  pub fn new() -> Self { Self::default() }

  /// Add (or replace) an equality condition on `column`.
  pub fn insert(&mut self, column: Column, value: impl Into<FieldValue>) -> Result<()> {
    if !column.is_filterable() {
      return Err(Error::UnfilterableColumn(column));
    }
    let value = value.into();
    if !value.matches_kind_of(column) {
      return Err(Error::invalid(column.as_str(), "value has the wrong type"));
    }
    self.fields.insert(column, value);
    Ok(())
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with(mut self, column: Column, value: impl Into<FieldValue>) -> Result<Self> {
    self.insert(column, value)?;
    Ok(self)
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn get(&self, column: Column) -> Option<&FieldValue> { self.fields.get(&column) }

  /// Entries in `Column` order.
  pub fn iter(&self) -> impl Iterator<Item = (Column, &FieldValue)> + '_ {
    self.fields.iter().map(|(c, v)| (*c, v))
  }
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// Partial update as submitted by a client; absent fields stay unchanged.
///
/// `age` is taken as a wide integer so out-of-range values reach validation
/// instead of failing deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonPatch {
  pub name:        Option<String>,
  pub surname:     Option<String>,
  pub patronymic:  Option<String>,
  pub age:         Option<i64>,
  pub gender:      Option<String>,
  pub nationality: Option<String>,
}

impl PersonPatch {
  /// Validate every supplied field and convert to column assignments.
  ///
  /// Fails with [`Error::EmptyUpdate`] when nothing was supplied.
  pub fn into_assignments(self) -> Result<Assignments> {
    let mut fields = BTreeMap::new();

    let text = [
      (Column::Name, self.name),
      (Column::Surname, self.surname),
      (Column::Patronymic, self.patronymic),
      (Column::Gender, self.gender),
      (Column::Nationality, self.nationality),
    ];
    for (column, value) in text {
      if let Some(value) = value {
        validate::letters(column.as_str(), &value)?;
        fields.insert(column, FieldValue::Text(value));
      }
    }

    if let Some(age) = self.age {
      let age = validate::age(age)?;
      fields.insert(Column::Age, FieldValue::Integer(i64::from(age)));
    }

    if fields.is_empty() {
      return Err(Error::EmptyUpdate);
    }
    Ok(Assignments { fields })
  }
}

/// A validated, non-empty set of column assignments for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignments {
  fields: BTreeMap<Column, FieldValue>,
}

impl Assignments {
  pub fn len(&self) -> usize { self.fields.len() }

  /// `true` when no column is assigned. Never the case for values returned
  /// by [`PersonPatch::into_assignments`].
  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn get(&self, column: Column) -> Option<&FieldValue> { self.fields.get(&column) }

  /// Entries in `Column` order.
  pub fn iter(&self) -> impl Iterator<Item = (Column, &FieldValue)> + '_ {
    self.fields.iter().map(|(c, v)| (*c, v))
  }
}
