//! Enclosures: capacity-bounded housing units animals are assigned to.
//!
//! Enclosures are provisioned outside this crate; from here their capacity is
//! read-only. Occupancy is never stored, only derived from the animal rows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally assigned enclosure identity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EnclosureId(pub i64);

impl fmt::Display for EnclosureId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A provisioned enclosure with its declared capacity ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclosureRecord {
  pub id:       EnclosureId,
  pub name:     String,
  pub capacity: u32,
}

/// An enclosure together with its live occupancy, computed on read, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclosureStatus {
  pub enclosure: EnclosureRecord,
  pub occupancy: u32,
}

impl EnclosureStatus {
  pub fn has_space(&self) -> bool {
    crate::ledger::has_space(Some(self.enclosure.capacity), self.occupancy)
  }

  /// Remaining slots; zero when full or over-full.
  pub fn free_slots(&self) -> u32 {
    self.enclosure.capacity.saturating_sub(self.occupancy)
  }
}

impl fmt::Display for EnclosureStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[{}] {} | Occupied: {}/{}",
      self.enclosure.id, self.enclosure.name, self.occupancy, self.enclosure.capacity
    )
  }
}
