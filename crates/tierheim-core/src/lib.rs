//! Core types and trait definitions for the shelter admission registry.
//!
//! This crate has no database dependencies. Storage backends
//! implement [`store::ShelterStore`]; everything that decides whether an
//! animal may be admitted lives here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod admission;
pub mod age;
pub mod animal;
pub mod duplicate;
pub mod enclosure;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod store;

pub use error::{Error, Result};
pub use registry::AdmissionRegistry;
