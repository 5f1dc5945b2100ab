//! Repository layer - Data access abstraction
//!
//! A single generic [`Store`] capability with two backends: SeaORM for
//! Postgres and an in-process store for `memory://` and tests.

pub(crate) mod entities;
mod memory_store;
pub(crate) mod sea_store;
mod store;

pub use memory_store::MemoryStore;
pub use sea_store::{SeaRecord, SeaStore};
pub use store::{AccountStore, Store};
