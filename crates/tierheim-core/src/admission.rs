//! The admission decision, evaluated inside one unit of work.
//!
//! A storage backend opens whatever makes its reads and the final insert one
//! atomic unit (an immediate SQLite transaction, a lock, ...) and hands it to
//! [`admit_within`] as an [`AdmissionScope`]. The capacity read, the duplicate
//! read, and the insert then all observe the same state, so two concurrent
//! admissions can never both take the last slot of an enclosure, and two
//! identical animals can never both be admitted.

use crate::{
  animal::{AnimalId, ResolvedAnimal},
  duplicate::DuplicateKey,
  enclosure::EnclosureId,
  ledger,
};

/// Reads and writes available inside one atomic unit of work.
pub trait AdmissionScope {
  type Error;

  /// The declared capacity of an enclosure, or `None` if it is not registered.
  fn capacity(&mut self, enclosure_id: EnclosureId) -> Result<Option<u32>, Self::Error>;

  /// The live number of animals assigned to an enclosure.
  fn occupancy(&mut self, enclosure_id: EnclosureId) -> Result<u32, Self::Error>;

  fn exists(&mut self, key: &DuplicateKey<'_>) -> Result<bool, Self::Error>;

  /// Persist the animal and return its store-assigned identity.
  fn insert(&mut self, animal: &ResolvedAnimal) -> Result<AnimalId, Self::Error>;
}

/// Why an admission was turned away. Nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
  EnclosureNotFound(EnclosureId),
  CapacityExceeded {
    enclosure_id: EnclosureId,
    capacity:     u32,
    occupancy:    u32,
  },
  Duplicate,
}

/// The outcome of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
  Admitted { id: AnimalId },
  Refused(Refusal),
}

/// Decide, and if allowed perform, the admission of `animal` within `scope`.
///
/// Checks run in order: capacity (only when the animal is assigned to an
/// enclosure), then duplicates. When both refuse, [`Refusal::Duplicate`] is
/// reported. The insert happens only when neither refuses; the caller commits
/// the unit of work only on [`Admission::Admitted`].
pub fn admit_within<S>(scope: &mut S, animal: &ResolvedAnimal) -> Result<Admission, S::Error>
where
  S: AdmissionScope + ?Sized,
{
  let capacity_refusal = match animal.enclosure_id {
    Some(enclosure_id) => {
      let verdict = match scope.capacity(enclosure_id)? {
        Some(capacity) => ledger::weigh(Some(capacity), scope.occupancy(enclosure_id)?),
        None => ledger::weigh(None, 0),
      };
      verdict.refusal(enclosure_id)
    }
    None => None,
  };

  if scope.exists(&DuplicateKey::of(animal))? {
    return Ok(Admission::Refused(Refusal::Duplicate));
  }
  if let Some(refusal) = capacity_refusal {
    return Ok(Admission::Refused(refusal));
  }

  let id = scope.insert(animal)?;
  Ok(Admission::Admitted { id })
}
