//! Animal records: the rows this crate admits, lists, and removes.
//!
//! Age is never stored. A record carries its (resolved) birth date, and age is
//! projected from it against "today" on every read.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{age, enclosure::EnclosureId};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Surrogate identity assigned by the store on admission; immutable afterward.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnimalId(pub i64);

impl fmt::Display for AnimalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

/// Stored as a single-letter code (`M`, `F`, `U`); parsing also accepts the
/// full word, case-insensitively.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Sex {
  #[strum(to_string = "M", serialize = "male")]
  Male,
  #[strum(to_string = "F", serialize = "female")]
  Female,
  #[default]
  #[strum(to_string = "U", serialize = "unknown")]
  Unknown,
}

// ─── NewAnimal ───────────────────────────────────────────────────────────────

/// An admission candidate, as supplied by the caller.
///
/// `age` and `birth_date` are raw input; the registry resolves them before
/// anything is persisted (see [`crate::age::resolve`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAnimal {
  pub name:         String,
  pub species:      String,
  pub birth_date:   Option<NaiveDate>,
  /// Whole years. Ignored when `birth_date` is present.
  pub age:          Option<u32>,
  /// `None` means unassigned; unassigned animals bypass capacity checks.
  pub enclosure_id: Option<EnclosureId>,
  pub sex:          Sex,
  pub color:        Option<String>,
  pub health_note:  Option<String>,
  /// Informational only.
  pub arrival_date: Option<NaiveDate>,
}

impl NewAnimal {
  /// Convenience constructor with all optional fields unset.
  pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      species: species.into(),
      ..Self::default()
    }
  }

  pub fn in_enclosure(mut self, enclosure_id: EnclosureId) -> Self {
    self.enclosure_id = Some(enclosure_id);
    self
  }

  pub fn born(mut self, birth_date: NaiveDate) -> Self {
    self.birth_date = Some(birth_date);
    self
  }

  pub fn aged(mut self, years: u32) -> Self {
    self.age = Some(years);
    self
  }
}

// ─── ResolvedAnimal ──────────────────────────────────────────────────────────

/// A validated candidate whose birth date has been resolved. This, not the
/// caller's raw input, is what the store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAnimal {
  pub name:         String,
  pub species:      String,
  pub birth_date:   Option<NaiveDate>,
  pub enclosure_id: Option<EnclosureId>,
  pub sex:          Sex,
  pub color:        Option<String>,
  pub health_note:  Option<String>,
  pub arrival_date: Option<NaiveDate>,
}

// ─── AnimalRecord ────────────────────────────────────────────────────────────

/// A persisted animal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
  pub id:           AnimalId,
  pub name:         String,
  pub species:      String,
  pub birth_date:   Option<NaiveDate>,
  pub enclosure_id: Option<EnclosureId>,
  pub sex:          Sex,
  pub color:        Option<String>,
  pub health_note:  Option<String>,
  pub arrival_date: Option<NaiveDate>,
}

impl AnimalRecord {
  #[cfg(test)]
  pub(crate) fn from_resolved(id: AnimalId, animal: ResolvedAnimal) -> Self {
    Self {
      id,
      name: animal.name,
      species: animal.species,
      birth_date: animal.birth_date,
      enclosure_id: animal.enclosure_id,
      sex: animal.sex,
      color: animal.color,
      health_note: animal.health_note,
      arrival_date: animal.arrival_date,
    }
  }

  /// Whole years between the birth date and `today`, or `None` when the birth
  /// date is unknown.
  pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
    self.birth_date.map(|born| age::whole_years_between(born, today))
  }
}

// ─── AnimalView ──────────────────────────────────────────────────────────────

/// The read model for listings: a record plus its age as of the moment the
/// view was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalView {
  #[serde(flatten)]
  pub record: AnimalRecord,
  pub age:    Option<u32>,
}

impl AnimalView {
  pub fn project(record: AnimalRecord, today: NaiveDate) -> Self {
    let age = record.age_on(today);
    Self { record, age }
  }
}
