//! SQL schema for the shelter SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Provisioned outside the admission path; capacity is read-only here.
CREATE TABLE IF NOT EXISTS enclosures (
    id        INTEGER PRIMARY KEY,
    name      TEXT    NOT NULL,
    capacity  INTEGER NOT NULL CHECK (capacity >= 0)
);

-- AUTOINCREMENT keeps ids monotonic, so `ORDER BY id DESC` is newest first
-- even after the newest row has been deleted.
-- enclosure_id carries no foreign key; enclosure removal is not handled by
-- this store.
CREATE TABLE IF NOT EXISTS animals (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL CHECK (name    != ''),
    species       TEXT NOT NULL CHECK (species != ''),
    birth_date    TEXT,            -- YYYY-MM-DD or NULL
    enclosure_id  INTEGER,         -- NULL = unassigned
    sex           TEXT NOT NULL DEFAULT 'U',   -- 'M' | 'F' | 'U'
    color         TEXT,
    health_note   TEXT,
    arrival_date  TEXT             -- YYYY-MM-DD or NULL
);

CREATE INDEX IF NOT EXISTS animals_enclosure_idx ON animals(enclosure_id);
CREATE INDEX IF NOT EXISTS animals_identity_idx  ON animals(name, species, birth_date);

PRAGMA user_version = 1;
";
