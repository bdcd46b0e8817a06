//! SQLite backend for the shelter admission registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Admissions run as immediate
//! transactions, which makes the capacity check, the duplicate check and the
//! insert atomic even across processes sharing one database file.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
