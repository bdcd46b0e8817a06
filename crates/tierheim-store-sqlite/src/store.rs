//! [`SqliteStore`]: the SQLite implementation of [`ShelterStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};

use tierheim_core::{
  admission::{Admission, AdmissionScope, admit_within},
  animal::{AnimalId, AnimalRecord, ResolvedAnimal},
  duplicate::DuplicateKey,
  enclosure::{EnclosureId, EnclosureRecord, EnclosureStatus},
  store::ShelterStore,
};

use crate::{
  Error, Result,
  encode::{ANIMAL_COLUMNS, RawAnimal, RawEnclosureStatus, encode_date, encode_sex},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A shelter record store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted, and every
/// clone shares the one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened shelter store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Register an enclosure. Provisioning belongs to the shelter's
  /// administration, not to the admission path; an id that is already
  /// registered fails with a constraint error.
  pub async fn provision_enclosure(&self, enclosure: EnclosureRecord) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO enclosures (id, name, capacity) VALUES (?1, ?2, ?3)",
          rusqlite::params![enclosure.id.0, enclosure.name, enclosure.capacity],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Admission scope ─────────────────────────────────────────────────────────

/// The reads and the insert of one admission, issued against an open
/// immediate transaction.
struct SqlScope<'c> {
  conn: &'c Connection,
}

impl AdmissionScope for SqlScope<'_> {
  type Error = rusqlite::Error;

  fn capacity(&mut self, enclosure_id: EnclosureId) -> rusqlite::Result<Option<u32>> {
    capacity_of(self.conn, enclosure_id)
  }

  fn occupancy(&mut self, enclosure_id: EnclosureId) -> rusqlite::Result<u32> {
    occupancy_of(self.conn, enclosure_id)
  }

  fn exists(&mut self, key: &DuplicateKey<'_>) -> rusqlite::Result<bool> {
    self.conn.query_row(
      "SELECT EXISTS (
         SELECT 1 FROM animals
         WHERE name = ?1 AND species = ?2 AND birth_date IS ?3
       )",
      rusqlite::params![key.name, key.species, key.birth_date.map(encode_date)],
      |r| r.get(0),
    )
  }

  fn insert(&mut self, animal: &ResolvedAnimal) -> rusqlite::Result<AnimalId> {
    self.conn.execute(
      "INSERT INTO animals (
         name, species, birth_date, enclosure_id,
         sex, color, health_note, arrival_date
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
      rusqlite::params![
        animal.name,
        animal.species,
        animal.birth_date.map(encode_date),
        animal.enclosure_id.map(|e| e.0),
        encode_sex(animal.sex),
        animal.color,
        animal.health_note,
        animal.arrival_date.map(encode_date),
      ],
    )?;
    Ok(AnimalId(self.conn.last_insert_rowid()))
  }
}

fn capacity_of(conn: &Connection, enclosure_id: EnclosureId) -> rusqlite::Result<Option<u32>> {
  conn
    .query_row(
      "SELECT capacity FROM enclosures WHERE id = ?1",
      rusqlite::params![enclosure_id.0],
      |r| r.get(0),
    )
    .optional()
}

fn occupancy_of(conn: &Connection, enclosure_id: EnclosureId) -> rusqlite::Result<u32> {
  conn.query_row(
    "SELECT COUNT(*) FROM animals WHERE enclosure_id = ?1",
    rusqlite::params![enclosure_id.0],
    |r| r.get(0),
  )
}

const ENCLOSURE_STATUS_SELECT: &str = "
  SELECT e.id, e.name, e.capacity,
         (SELECT COUNT(*) FROM animals a WHERE a.enclosure_id = e.id)
  FROM enclosures e";

// ─── ShelterStore impl ───────────────────────────────────────────────────────

impl ShelterStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn admit(&self, animal: ResolvedAnimal) -> Result<Admission> {
    let admission = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front, so no other writer can
        // change occupancy between the checks and the insert.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let admission = admit_within(&mut SqlScope { conn: &tx }, &animal)?;
        if matches!(admission, Admission::Admitted { .. }) {
          tx.commit()?;
        }
        Ok(admission)
      })
      .await?;
    Ok(admission)
  }

  async fn remove_animal(&self, id: AnimalId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM animals WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Animal reads ──────────────────────────────────────────────────────────

  async fn get_animal(&self, id: AnimalId) -> Result<Option<AnimalRecord>> {
    let raw: Option<RawAnimal> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ANIMAL_COLUMNS} FROM animals WHERE id = ?1"),
              rusqlite::params![id.0],
              RawAnimal::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAnimal::into_record).transpose()
  }

  async fn list_animals(&self) -> Result<Vec<AnimalRecord>> {
    let raws: Vec<RawAnimal> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {ANIMAL_COLUMNS} FROM animals ORDER BY id DESC"))?;
        let rows = stmt
          .query_map([], RawAnimal::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAnimal::into_record).collect()
  }

  async fn count_animals(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM animals", [], |r| r.get(0))?))
      .await?;
    Ok(count.unsigned_abs())
  }

  async fn count_in_enclosure(&self, enclosure_id: EnclosureId) -> Result<u32> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(occupancy_of(conn, enclosure_id)?))
        .await?,
    )
  }

  // ── Enclosure reads ───────────────────────────────────────────────────────

  async fn get_enclosure(&self, enclosure_id: EnclosureId) -> Result<Option<EnclosureRecord>> {
    let row: Option<(String, u32)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT name, capacity FROM enclosures WHERE id = ?1",
              rusqlite::params![enclosure_id.0],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row.map(|(name, capacity)| EnclosureRecord { id: enclosure_id, name, capacity }))
  }

  async fn enclosure_status(&self, enclosure_id: EnclosureId) -> Result<Option<EnclosureStatus>> {
    let raw: Option<RawEnclosureStatus> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{ENCLOSURE_STATUS_SELECT} WHERE e.id = ?1"),
              rusqlite::params![enclosure_id.0],
              RawEnclosureStatus::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawEnclosureStatus::into_status))
  }

  async fn list_enclosures(&self) -> Result<Vec<EnclosureStatus>> {
    let raws: Vec<RawEnclosureStatus> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{ENCLOSURE_STATUS_SELECT} ORDER BY e.id"))?;
        let rows = stmt
          .query_map([], RawEnclosureStatus::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawEnclosureStatus::into_status).collect())
  }
}
