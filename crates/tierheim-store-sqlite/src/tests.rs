//! Integration tests for `SqliteStore` behind an `AdmissionRegistry`.

use std::sync::Arc;

use chrono::NaiveDate;
use tierheim_core::{
  AdmissionRegistry, Error,
  age::FixedClock,
  animal::{AnimalId, NewAnimal, Sex},
  enclosure::{EnclosureId, EnclosureRecord},
  store::ShelterStore,
};

use crate::SqliteStore;

type Registry = AdmissionRegistry<SqliteStore, FixedClock>;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn registry(store: SqliteStore) -> Registry {
  AdmissionRegistry::with_clock(store, FixedClock(date(2025, 1, 2)))
}

async fn provision(s: &SqliteStore, id: i64, capacity: u32) {
  s.provision_enclosure(EnclosureRecord {
    id: EnclosureId(id),
    name: format!("Enclosure {id}"),
    capacity,
  })
  .await
  .unwrap();
}

// ─── Admission ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn admit_and_find() {
  let reg = registry(store().await);

  let mut candidate = NewAnimal::new("Rex", "Dog").born(date(2015, 1, 1));
  candidate.sex = Sex::Male;
  candidate.color = Some("brown".into());
  candidate.arrival_date = Some(date(2024, 12, 24));
  let id = reg.admit(candidate).await.unwrap();

  let view = reg.find(id).await.unwrap().unwrap();
  assert_eq!(view.record.id, id);
  assert_eq!(view.record.name, "Rex");
  assert_eq!(view.record.sex, Sex::Male);
  assert_eq!(view.record.color.as_deref(), Some("brown"));
  assert_eq!(view.record.arrival_date, Some(date(2024, 12, 24)));
  assert_eq!(view.record.enclosure_id, None);
  assert_eq!(view.age, Some(10));
}

#[tokio::test]
async fn find_missing_returns_none() {
  let reg = registry(store().await);
  assert!(reg.find(AnimalId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn age_only_persists_synthesised_birth_date() {
  let reg = registry(store().await);
  let id = reg.admit(NewAnimal::new("Bella", "Dog").aged(10)).await.unwrap();

  let view = reg.find(id).await.unwrap().unwrap();
  assert_eq!(view.record.birth_date, Some(date(2015, 1, 2)));
  assert_eq!(view.age, Some(10));
}

#[tokio::test]
async fn no_age_information_stays_null() {
  let reg = registry(store().await);
  let id = reg.admit(NewAnimal::new("Tom", "Cat")).await.unwrap();

  let view = reg.find(id).await.unwrap().unwrap();
  assert_eq!(view.record.birth_date, None);
  assert_eq!(view.age, None);
}

#[tokio::test]
async fn age_is_recomputed_on_read() {
  let s = store().await;
  let id = registry(s.clone())
    .admit(NewAnimal::new("Rex", "Dog").aged(3))
    .await
    .unwrap();

  // Same row, read two years later.
  let later = AdmissionRegistry::with_clock(s, FixedClock(date(2027, 1, 2)));
  let view = later.find(id).await.unwrap().unwrap();
  assert_eq!(view.age, Some(5));
}

#[tokio::test]
async fn unusual_dates_are_admitted_as_resolved() {
  let reg = registry(store().await);
  let unborn = reg
    .admit(NewAnimal::new("Pip", "Rabbit").born(date(2025, 3, 1)))
    .await
    .unwrap();
  let ancient = reg.admit(NewAnimal::new("Shelly", "Tortoise").aged(160)).await.unwrap();

  let view = reg.find(unborn).await.unwrap().unwrap();
  assert_eq!(view.record.birth_date, Some(date(2025, 3, 1)));
  assert_eq!(view.age, Some(0));

  let view = reg.find(ancient).await.unwrap().unwrap();
  assert_eq!(view.record.birth_date, Some(date(1865, 1, 2)));
  assert_eq!(view.age, Some(160));
}

#[tokio::test]
async fn validation_failure_writes_nothing() {
  let reg = registry(store().await);
  let err = reg.admit(NewAnimal::new("", "Dog")).await.unwrap_err();
  assert!(matches!(err, Error::Validation { field: "name", .. }));
  assert_eq!(reg.total_count().await.unwrap(), 0);
}

// ─── Duplicates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_without_birth_date_is_refused() {
  let reg = registry(store().await);

  reg.admit(NewAnimal::new("Rex", "Dog")).await.unwrap();
  let err = reg.admit(NewAnimal::new("Rex", "Dog")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::DuplicateRecord { ref name, ref species, birth_date: None }
      if name == "Rex" && species == "Dog"
  ));

  // Differs only in species.
  reg.admit(NewAnimal::new("Rex", "Cat")).await.unwrap();
  assert_eq!(reg.total_count().await.unwrap(), 2);
}

#[tokio::test]
async fn known_and_unknown_birth_dates_do_not_collide() {
  let reg = registry(store().await);

  reg.admit(NewAnimal::new("Rex", "Dog")).await.unwrap();
  reg
    .admit(NewAnimal::new("Rex", "Dog").born(date(2020, 5, 1)))
    .await
    .unwrap();

  let err = reg
    .admit(NewAnimal::new("Rex", "Dog").born(date(2020, 5, 1)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateRecord { .. }));
}

#[tokio::test]
async fn age_and_matching_birth_date_collide() {
  let reg = registry(store().await);

  reg.admit(NewAnimal::new("Rex", "Dog").aged(10)).await.unwrap();
  let err = reg
    .admit(NewAnimal::new("Rex", "Dog").born(date(2015, 1, 2)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateRecord { .. }));
}

#[tokio::test]
async fn duplicate_check_is_case_sensitive() {
  let reg = registry(store().await);

  reg.admit(NewAnimal::new("Rex", "Dog")).await.unwrap();
  reg.admit(NewAnimal::new("rex", "Dog")).await.unwrap();
  assert_eq!(reg.total_count().await.unwrap(), 2);
}

// ─── Capacity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn capacity_boundary_and_release() {
  let s = store().await;
  provision(&s, 1, 2).await;
  let reg = registry(s);

  let first = reg
    .admit(NewAnimal::new("Rex", "Dog").in_enclosure(EnclosureId(1)))
    .await
    .unwrap();
  reg
    .admit(NewAnimal::new("Bella", "Dog").in_enclosure(EnclosureId(1)))
    .await
    .unwrap();
  assert_eq!(reg.occupancy(EnclosureId(1)).await.unwrap(), 2);
  assert!(!reg.has_space(EnclosureId(1)).await.unwrap());

  let luna = NewAnimal::new("Luna", "Dog").in_enclosure(EnclosureId(1));
  let err = reg.admit(luna.clone()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::CapacityExceeded { enclosure_id: EnclosureId(1), capacity: 2, occupancy: 2 }
  ));
  assert_eq!(reg.total_count().await.unwrap(), 2);

  reg.remove(first).await.unwrap();
  assert!(reg.has_space(EnclosureId(1)).await.unwrap());
  reg.admit(luna).await.unwrap();
  assert_eq!(reg.count_in_enclosure(EnclosureId(1)).await.unwrap(), 2);
}

#[tokio::test]
async fn zero_capacity_enclosure_admits_nobody() {
  let s = store().await;
  provision(&s, 1, 0).await;
  let reg = registry(s);

  let err = reg
    .admit(NewAnimal::new("Rex", "Dog").in_enclosure(EnclosureId(1)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CapacityExceeded { capacity: 0, .. }));
}

#[tokio::test]
async fn unknown_enclosure_fails_closed() {
  let reg = registry(store().await);

  let err = reg
    .admit(NewAnimal::new("Rex", "Dog").in_enclosure(EnclosureId(99)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EnclosureNotFound(EnclosureId(99))));
  assert_eq!(reg.total_count().await.unwrap(), 0);

  assert!(!reg.has_space(EnclosureId(99)).await.unwrap());
  assert!(matches!(
    reg.capacity(EnclosureId(99)).await.unwrap_err(),
    Error::EnclosureNotFound(EnclosureId(99))
  ));
}

#[tokio::test]
async fn unassigned_animals_count_nowhere() {
  let s = store().await;
  provision(&s, 1, 1).await;
  let reg = registry(s);

  reg.admit(NewAnimal::new("Rex", "Dog")).await.unwrap();
  reg.admit(NewAnimal::new("Tom", "Cat")).await.unwrap();

  assert_eq!(reg.total_count().await.unwrap(), 2);
  assert_eq!(reg.occupancy(EnclosureId(1)).await.unwrap(), 0);
  assert_eq!(reg.capacity(EnclosureId(1)).await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_is_reported_when_enclosure_is_also_full() {
  let s = store().await;
  provision(&s, 5, 1).await;
  let reg = registry(s);

  let milo = NewAnimal::new("Milo", "Cat").in_enclosure(EnclosureId(5));
  let id = reg.admit(milo.clone()).await.unwrap();
  assert_eq!(reg.find(id).await.unwrap().unwrap().record.enclosure_id, Some(EnclosureId(5)));

  let err = reg.admit(milo).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateRecord { .. }));
  assert_eq!(reg.occupancy(EnclosureId(5)).await.unwrap(), 1);
}

// ─── Removal and listing ─────────────────────────────────────────────────────

#[tokio::test]
async fn remove_is_idempotent() {
  let reg = registry(store().await);
  let id = reg.admit(NewAnimal::new("Rex", "Dog")).await.unwrap();

  reg.remove(id).await.unwrap();
  reg.remove(id).await.unwrap();
  reg.remove(AnimalId(12345)).await.unwrap();

  assert!(reg.find(id).await.unwrap().is_none());
  assert_eq!(reg.total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn remove_reports_whether_a_row_went_away() {
  let s = store().await;
  let id = registry(s.clone())
    .admit(NewAnimal::new("Rex", "Dog"))
    .await
    .unwrap();

  assert!(s.remove_animal(id).await.unwrap());
  assert!(!s.remove_animal(id).await.unwrap());
}

#[tokio::test]
async fn find_all_is_newest_first() {
  let reg = registry(store().await);
  let a = reg.admit(NewAnimal::new("A", "Dog")).await.unwrap();
  let b = reg.admit(NewAnimal::new("B", "Dog")).await.unwrap();
  let c = reg.admit(NewAnimal::new("C", "Dog")).await.unwrap();
  assert_eq!((a, b, c), (AnimalId(1), AnimalId(2), AnimalId(3)));

  let ids: Vec<_> = reg
    .find_all()
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.record.id)
    .collect();
  assert_eq!(ids, vec![AnimalId(3), AnimalId(2), AnimalId(1)]);
}

#[tokio::test]
async fn ids_are_not_reused_after_removal() {
  let reg = registry(store().await);
  reg.admit(NewAnimal::new("A", "Dog")).await.unwrap();
  let b = reg.admit(NewAnimal::new("B", "Dog")).await.unwrap();
  reg.remove(b).await.unwrap();

  let c = reg.admit(NewAnimal::new("C", "Dog")).await.unwrap();
  assert!(c > b);
  assert_eq!(reg.find_all().await.unwrap()[0].record.id, c);
}

// ─── Enclosures ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_enclosures_with_live_occupancy() {
  let s = store().await;
  provision(&s, 2, 3).await;
  provision(&s, 1, 1).await;
  let reg = registry(s);

  reg
    .admit(NewAnimal::new("Rex", "Dog").in_enclosure(EnclosureId(2)))
    .await
    .unwrap();

  let all = reg.list_enclosures().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].enclosure.id, EnclosureId(1));
  assert_eq!(all[0].occupancy, 0);
  assert_eq!(all[1].to_string(), "[2] Enclosure 2 | Occupied: 1/3");

  let status = reg.enclosure_status(EnclosureId(2)).await.unwrap();
  assert_eq!(status.free_slots(), 2);
  assert!(matches!(
    reg.enclosure_status(EnclosureId(7)).await.unwrap_err(),
    Error::EnclosureNotFound(EnclosureId(7))
  ));
}

#[tokio::test]
async fn provisioning_an_existing_id_fails() {
  let s = store().await;
  provision(&s, 1, 1).await;

  let err = s
    .provision_enclosure(EnclosureRecord {
      id:       EnclosureId(1),
      name:     "Again".into(),
      capacity: 4,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
  assert_eq!(s.get_enclosure(EnclosureId(1)).await.unwrap().unwrap().capacity, 1);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admissions_never_overflow() {
  let s = store().await;
  provision(&s, 1, 3).await;
  let reg = Arc::new(registry(s));

  let handles: Vec<_> = (0..16)
    .map(|i| {
      let reg = Arc::clone(&reg);
      tokio::spawn(async move {
        reg
          .admit(NewAnimal::new(format!("Pup {i}"), "Dog").in_enclosure(EnclosureId(1)))
          .await
      })
    })
    .collect();

  let mut admitted = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => admitted += 1,
      Err(Error::CapacityExceeded { .. }) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  assert_eq!(admitted, 3);
  assert_eq!(reg.occupancy(EnclosureId(1)).await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_admissions_admit_once() {
  let reg = Arc::new(registry(store().await));

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let reg = Arc::clone(&reg);
      tokio::spawn(async move { reg.admit(NewAnimal::new("Rex", "Dog")).await })
    })
    .collect();

  let mut admitted = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => admitted += 1,
      Err(Error::DuplicateRecord { .. }) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  assert_eq!(admitted, 1);
  assert_eq!(reg.total_count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_connections_share_one_ceiling() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("shelter.db");
  let first = SqliteStore::open(&path).await.unwrap();
  let second = SqliteStore::open(&path).await.unwrap();
  provision(&first, 1, 2).await;

  let regs = [Arc::new(registry(first)), Arc::new(registry(second))];

  let handles: Vec<_> = (0..10)
    .map(|i| {
      let reg = Arc::clone(&regs[i % 2]);
      tokio::spawn(async move {
        reg
          .admit(NewAnimal::new(format!("Kit {i}"), "Cat").in_enclosure(EnclosureId(1)))
          .await
      })
    })
    .collect();

  let mut admitted = 0;
  for handle in handles {
    if handle.await.unwrap().is_ok() {
      admitted += 1;
    }
  }

  assert_eq!(admitted, 2);
  assert_eq!(regs[0].occupancy(EnclosureId(1)).await.unwrap(), 2);
  assert_eq!(regs[1].occupancy(EnclosureId(1)).await.unwrap(), 2);
}
