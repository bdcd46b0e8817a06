//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text. Sex is stored as its one-letter
//! code. Ids are stored as plain integers.

use std::str::FromStr as _;

use chrono::NaiveDate;
use tierheim_core::{
  animal::{AnimalId, AnimalRecord, Sex},
  enclosure::{EnclosureId, EnclosureRecord, EnclosureStatus},
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

pub fn encode_sex(sex: Sex) -> &'static str { sex.into() }

pub fn decode_sex(s: &str) -> Result<Sex> {
  Sex::from_str(s).map_err(|_| Error::UnknownCode {
    column: "sex",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for every animal read, in [`RawAnimal`] field order.
pub const ANIMAL_COLUMNS: &str = "id, name, species, birth_date, enclosure_id, sex, color, \
                                  health_note, arrival_date";

/// Raw values read directly from an `animals` row.
pub struct RawAnimal {
  pub id:           i64,
  pub name:         String,
  pub species:      String,
  pub birth_date:   Option<String>,
  pub enclosure_id: Option<i64>,
  pub sex:          String,
  pub color:        Option<String>,
  pub health_note:  Option<String>,
  pub arrival_date: Option<String>,
}

impl RawAnimal {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      name:         row.get(1)?,
      species:      row.get(2)?,
      birth_date:   row.get(3)?,
      enclosure_id: row.get(4)?,
      sex:          row.get(5)?,
      color:        row.get(6)?,
      health_note:  row.get(7)?,
      arrival_date: row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<AnimalRecord> {
    Ok(AnimalRecord {
      id:           AnimalId(self.id),
      name:         self.name,
      species:      self.species,
      birth_date:   decode_opt_date(self.birth_date)?,
      enclosure_id: self.enclosure_id.map(EnclosureId),
      sex:          decode_sex(&self.sex)?,
      color:        self.color,
      health_note:  self.health_note,
      arrival_date: decode_opt_date(self.arrival_date)?,
    })
  }
}

/// Raw values of an `enclosures` row joined with its live animal count.
pub struct RawEnclosureStatus {
  pub id:        i64,
  pub name:      String,
  pub capacity:  u32,
  pub occupancy: u32,
}

impl RawEnclosureStatus {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      name:      row.get(1)?,
      capacity:  row.get(2)?,
      occupancy: row.get(3)?,
    })
  }

  pub fn into_status(self) -> EnclosureStatus {
    EnclosureStatus {
      enclosure: EnclosureRecord {
        id:       EnclosureId(self.id),
        name:     self.name,
        capacity: self.capacity,
      },
      occupancy: self.occupancy,
    }
  }
}
