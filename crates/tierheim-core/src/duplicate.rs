//! Duplicate detection key.
//!
//! Two records are the same animal when name and species match exactly
//! (case-sensitive) and their birth dates are equal. Two unknown birth dates
//! are equal to each other; an unknown birth date never equals a known one.

use chrono::NaiveDate;

#[cfg(test)]
use crate::animal::AnimalRecord;
use crate::animal::ResolvedAnimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey<'a> {
  pub name:       &'a str,
  pub species:    &'a str,
  pub birth_date: Option<NaiveDate>,
}

impl<'a> DuplicateKey<'a> {
  /// The key of a resolved candidate. Uses the resolved birth date, so a
  /// candidate admitted by age collides with one admitted by the synthesised
  /// date on the same day.
  pub fn of(animal: &'a ResolvedAnimal) -> Self {
    Self {
      name:       &animal.name,
      species:    &animal.species,
      birth_date: animal.birth_date,
    }
  }

  /// In-memory form of the store-side lookup.
  #[cfg(test)]
  pub(crate) fn matches(&self, record: &AnimalRecord) -> bool {
    record.name == self.name
      && record.species == self.species
      && record.birth_date == self.birth_date
  }
}
