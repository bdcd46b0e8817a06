//! Capacity ledger: weighs an enclosure's ceiling against its live
//! occupancy.
//!
//! Nothing here caches. Callers pass in a capacity and an occupancy read at
//! decision time; inside an admission both come from the same unit of work.

use crate::{admission::Refusal, enclosure::EnclosureId};

/// The outcome of weighing one enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  /// At least one free slot.
  Vacant { capacity: u32, occupancy: u32 },
  Full { capacity: u32, occupancy: u32 },
  /// No enclosure is registered under the id.
  Missing,
}

impl Verdict {
  pub fn has_space(&self) -> bool { matches!(self, Self::Vacant { .. }) }

  /// The refusal this verdict implies for an admission into `enclosure_id`,
  /// if any.
  pub fn refusal(&self, enclosure_id: EnclosureId) -> Option<Refusal> {
    match *self {
      Self::Vacant { .. } => None,
      Self::Full { capacity, occupancy } => Some(Refusal::CapacityExceeded {
        enclosure_id,
        capacity,
        occupancy,
      }),
      Self::Missing => Some(Refusal::EnclosureNotFound(enclosure_id)),
    }
  }
}

/// Weigh a capacity (`None` when the enclosure is unknown) against an
/// occupancy. Fails closed: a missing enclosure or a zero capacity never has
/// space.
pub fn weigh(capacity: Option<u32>, occupancy: u32) -> Verdict {
  match capacity {
    None => Verdict::Missing,
    Some(capacity) if occupancy < capacity => Verdict::Vacant { capacity, occupancy },
    Some(capacity) => Verdict::Full { capacity, occupancy },
  }
}

pub fn has_space(capacity: Option<u32>, occupancy: u32) -> bool {
  weigh(capacity, occupancy).has_space()
}
