//! Person — the sole entity of the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, validate};

/// A stored person.
///
/// `id` and `created_at` are assigned once by the service at creation and
/// never change afterwards. `age`, `gender` and `nationality` come from the
/// enrichment provider and may later be overwritten by explicit updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          Uuid,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  Option<String>,
  pub age:         u8,
  pub gender:      String,
  /// Country code; `None` when the provider had no country data for the name.
  pub nationality: Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Client-supplied input for creating a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub name:       String,
  pub surname:    String,
  #[serde(default)]
  pub patronymic: Option<String>,
}

impl NewPerson {
  pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
    Self { name: name.into(), surname: surname.into(), patronymic: None }
  }

  pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
    self.patronymic = Some(patronymic.into());
    self
  }

  /// Check the letters-only rules. An empty patronymic counts as absent.
  pub fn validate(&self) -> Result<()> {
    validate::letters("name", &self.name)?;
    validate::letters("surname", &self.surname)?;
    if let Some(p) = self.patronymic.as_deref().filter(|p| !p.is_empty()) {
      validate::letters("patronymic", p)?;
    }
    Ok(())
  }

  /// The patronymic with `""` normalised to `None`.
  pub fn patronymic(&self) -> Option<String> {
    self.patronymic.clone().filter(|p| !p.is_empty())
  }
}
