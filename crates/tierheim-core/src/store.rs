//! The `ShelterStore` trait: the record store consumed by the registry.
//!
//! The trait is implemented by storage backends (e.g. `tierheim-store-sqlite`).
//! [`crate::AdmissionRegistry`] depends on this abstraction, not on any
//! concrete backend, and receives the store at construction.

use std::future::Future;

use crate::{
  admission::Admission,
  animal::{AnimalId, AnimalRecord, ResolvedAnimal},
  enclosure::{EnclosureId, EnclosureRecord, EnclosureStatus},
};

/// Abstraction over a shelter record store backend.
///
/// No method caches across calls; every read reflects the store as of that
/// call. All methods return `Send` futures so a store can be shared across
/// tasks of a multi-threaded runtime.
pub trait ShelterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Run [`crate::admission::admit_within`] for `animal` inside one atomic
  /// unit of work, committing only if the animal was admitted.
  ///
  /// Implementations must serialise this against every other `admit` on the
  /// same store, so that the capacity read, the duplicate read and the insert
  /// behave as one step.
  fn admit(
    &self,
    animal: ResolvedAnimal,
  ) -> impl Future<Output = Result<Admission, Self::Error>> + Send + '_;

  /// Delete an animal. Returns whether a row was removed.
  fn remove_animal(
    &self,
    id: AnimalId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Animal reads ──────────────────────────────────────────────────────

  fn get_animal(
    &self,
    id: AnimalId,
  ) -> impl Future<Output = Result<Option<AnimalRecord>, Self::Error>> + Send + '_;

  /// All animals, ordered by identity descending (most recent first).
  fn list_animals(
    &self,
  ) -> impl Future<Output = Result<Vec<AnimalRecord>, Self::Error>> + Send + '_;

  fn count_animals(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Number of animals currently assigned to `enclosure_id`.
  fn count_in_enclosure(
    &self,
    enclosure_id: EnclosureId,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  // ── Enclosure reads ───────────────────────────────────────────────────

  /// Retrieve an enclosure by id. Returns `None` if not registered.
  fn get_enclosure(
    &self,
    enclosure_id: EnclosureId,
  ) -> impl Future<Output = Result<Option<EnclosureRecord>, Self::Error>> + Send + '_;

  /// An enclosure with its live occupancy, read together.
  fn enclosure_status(
    &self,
    enclosure_id: EnclosureId,
  ) -> impl Future<Output = Result<Option<EnclosureStatus>, Self::Error>> + Send + '_;

  /// Every enclosure with its live occupancy, ordered by id.
  fn list_enclosures(
    &self,
  ) -> impl Future<Output = Result<Vec<EnclosureStatus>, Self::Error>> + Send + '_;
}
