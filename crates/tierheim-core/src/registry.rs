//! [`AdmissionRegistry`]: the only way animals enter or leave the store.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  admission::{Admission, Refusal},
  age::{self, Clock, SystemClock},
  animal::{AnimalId, AnimalView, NewAnimal, ResolvedAnimal},
  enclosure::{EnclosureId, EnclosureStatus},
  ledger,
  store::ShelterStore,
};

/// Ages above this are admitted but logged as implausible.
pub const MAX_AGE_YEARS: u32 = 150;

/// Orchestrates validation, age resolution, capacity and duplicate checks
/// into a single admission, and exposes the reads that share the same
/// occupancy computation.
///
/// The store handle is injected and owned by the caller's choice of `S`
/// (typically a cheaply cloneable handle). "Today" comes from `C`.
pub struct AdmissionRegistry<S, C = SystemClock> {
  store: S,
  clock: C,
}

impl<S: ShelterStore> AdmissionRegistry<S> {
  pub fn new(store: S) -> Self { Self { store, clock: SystemClock } }
}

impl<S: ShelterStore, C: Clock> AdmissionRegistry<S, C> {
  pub fn with_clock(store: S, clock: C) -> Self { Self { store, clock } }

  pub fn store(&self) -> &S { &self.store }

  pub fn today(&self) -> NaiveDate { self.clock.today() }

  // ── Admission ─────────────────────────────────────────────────────────

  /// Admit a new animal and return its store-assigned id.
  ///
  /// The birth date is resolved first (see [`age::resolve`]); when only an
  /// age was given, the persisted birth date is the approximation
  /// `today − age years`. Capacity and duplicate checks then run in one unit
  /// of work with the insert. Every refusal leaves the store unmodified.
  pub async fn admit(&self, candidate: NewAnimal) -> Result<AnimalId> {
    let animal = validate(candidate, self.today())?;
    debug!(
      name = %animal.name,
      species = %animal.species,
      enclosure = ?animal.enclosure_id,
      "admitting animal"
    );

    let name = animal.name.clone();
    let species = animal.species.clone();
    let birth_date = animal.birth_date;

    let outcome = self.store.admit(animal).await.map_err(Error::storage)?;

    match outcome {
      Admission::Admitted { id } => {
        info!(%id, %name, %species, "animal admitted");
        Ok(id)
      }
      Admission::Refused(refusal) => {
        warn!(%name, %species, ?refusal, "admission refused");
        Err(match refusal {
          Refusal::Duplicate => Error::DuplicateRecord { name, species, birth_date },
          Refusal::CapacityExceeded { enclosure_id, capacity, occupancy } => {
            Error::CapacityExceeded { enclosure_id, capacity, occupancy }
          }
          Refusal::EnclosureNotFound(enclosure_id) => Error::EnclosureNotFound(enclosure_id),
        })
      }
    }
  }

  /// Delete an animal. Removing an id that does not exist is not an error.
  pub async fn remove(&self, id: AnimalId) -> Result<()> {
    let removed = self.store.remove_animal(id).await.map_err(Error::storage)?;
    if removed {
      info!(%id, "animal removed");
    } else {
      debug!(%id, "remove: no such animal");
    }
    Ok(())
  }

  // ── Animal reads ──────────────────────────────────────────────────────

  /// All animals, most recently admitted first, each with its age computed
  /// as of today.
  pub async fn find_all(&self) -> Result<Vec<AnimalView>> {
    let today = self.today();
    let records = self.store.list_animals().await.map_err(Error::storage)?;
    Ok(records.into_iter().map(|r| AnimalView::project(r, today)).collect())
  }

  pub async fn find(&self, id: AnimalId) -> Result<Option<AnimalView>> {
    let today = self.today();
    let record = self.store.get_animal(id).await.map_err(Error::storage)?;
    Ok(record.map(|r| AnimalView::project(r, today)))
  }

  pub async fn total_count(&self) -> Result<u64> {
    self.store.count_animals().await.map_err(Error::storage)
  }

  pub async fn count_in_enclosure(&self, enclosure_id: EnclosureId) -> Result<u32> {
    self.occupancy(enclosure_id).await
  }

  // ── Capacity ledger ───────────────────────────────────────────────────

  /// Live count of animals assigned to the enclosure. Unknown enclosures have
  /// no occupants.
  pub async fn occupancy(&self, enclosure_id: EnclosureId) -> Result<u32> {
    self
      .store
      .count_in_enclosure(enclosure_id)
      .await
      .map_err(Error::storage)
  }

  /// Declared capacity; [`Error::EnclosureNotFound`] if unregistered.
  pub async fn capacity(&self, enclosure_id: EnclosureId) -> Result<u32> {
    self
      .store
      .get_enclosure(enclosure_id)
      .await
      .map_err(Error::storage)?
      .map(|e| e.capacity)
      .ok_or(Error::EnclosureNotFound(enclosure_id))
  }

  /// Whether one more animal fits. A missing enclosure has no space.
  pub async fn has_space(&self, enclosure_id: EnclosureId) -> Result<bool> {
    let status = self
      .store
      .enclosure_status(enclosure_id)
      .await
      .map_err(Error::storage)?;
    Ok(match status {
      Some(s) => ledger::has_space(Some(s.enclosure.capacity), s.occupancy),
      None => ledger::has_space(None, 0),
    })
  }

  /// Capacity and occupancy of one enclosure; [`Error::EnclosureNotFound`]
  /// if unregistered.
  pub async fn enclosure_status(&self, enclosure_id: EnclosureId) -> Result<EnclosureStatus> {
    self
      .store
      .enclosure_status(enclosure_id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::EnclosureNotFound(enclosure_id))
  }

  pub async fn list_enclosures(&self) -> Result<Vec<EnclosureStatus>> {
    self.store.list_enclosures().await.map_err(Error::storage)
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn validate(candidate: NewAnimal, today: NaiveDate) -> Result<ResolvedAnimal> {
  let name = required("name", candidate.name)?;
  let species = required("species", candidate.species)?;

  if let Some(born) = candidate.birth_date
    && born > today
  {
    warn!(%name, %born, "birth date lies in the future; age reads as 0");
  }
  if let Some(years) = candidate.age
    && years > MAX_AGE_YEARS
  {
    warn!(%name, years, "implausible age");
  }

  let resolved = age::resolve(candidate.birth_date, candidate.age, today);

  Ok(ResolvedAnimal {
    name,
    species,
    birth_date: resolved.birth_date,
    enclosure_id: candidate.enclosure_id,
    sex: candidate.sex,
    color: optional_text(candidate.color),
    health_note: optional_text(candidate.health_note),
    arrival_date: candidate.arrival_date,
  })
}

fn required(field: &'static str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(field, "is required"));
  }
  Ok(trimmed.to_owned())
}

fn optional_text(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}
