//! Age resolution: deriving a consistent (birth date, age) pair.
//!
//! A known birth date is authoritative and age is recomputed from it. When only
//! an age is supplied, a birth date is synthesised as `today − age years`. That
//! synthesised date is an approximation: it assumes the animal was born on
//! today's month and day.

use chrono::{Datelike as _, Local, Months, NaiveDate};

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of "today" for age calculations.
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// The local calendar date of the running system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// A clock pinned to one date, useful for testing.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.0 }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// The canonical (birth date, age) pair for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBirth {
  pub birth_date: Option<NaiveDate>,
  pub age:        Option<u32>,
}

/// Resolve optional birth date and age input against `today`.
///
/// Total over its inputs:
/// - birth date present: kept, age recomputed (truncating);
/// - only age present: birth date synthesised as `today − age years`;
/// - neither: both stay absent (never zero).
///
/// If `today − age years` falls outside the representable calendar the birth
/// date stays absent and the supplied age is carried through unchanged.
pub fn resolve(
  birth_date: Option<NaiveDate>,
  age: Option<u32>,
  today: NaiveDate,
) -> ResolvedBirth {
  match (birth_date, age) {
    (Some(born), _) => ResolvedBirth {
      birth_date: Some(born),
      age:        Some(whole_years_between(born, today)),
    },
    (None, Some(years)) => match years_before(today, years) {
      Some(born) => ResolvedBirth {
        birth_date: Some(born),
        age:        Some(whole_years_between(born, today)),
      },
      None => ResolvedBirth { birth_date: None, age: Some(years) },
    },
    (None, None) => ResolvedBirth { birth_date: None, age: None },
  }
}

/// Whole calendar years elapsed from `born` to `today`, truncating. A birth
/// date after `today` yields zero.
pub fn whole_years_between(born: NaiveDate, today: NaiveDate) -> u32 {
  if born >= today {
    return 0;
  }
  let mut years = today.year() - born.year();
  if (today.month(), today.day()) < (born.month(), born.day()) {
    years -= 1;
  }
  u32::try_from(years).unwrap_or(0)
}

/// `today` moved back by `years` calendar years; 29 February becomes
/// 28 February in non-leap target years.
fn years_before(today: NaiveDate, years: u32) -> Option<NaiveDate> {
  today.checked_sub_months(Months::new(years.checked_mul(12)?))
}
