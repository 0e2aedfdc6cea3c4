//! File-backed [`StateStore`](sqlsage_core::state::StateStore) for the
//! sqlsage training record.
//!
//! The record is a small JSON file. Commits go through a temp file in the
//! same directory followed by an atomic rename, so a crash mid-write can
//! never leave a partial record behind.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FileStateStore;
