//! Persistence layer for the drones server.
//!
//! Provides SQLite-backed storage for categories, drones, pilots, and
//! competitions. The state store keeps a write-through DashMap cache on top.

pub mod categories;
pub mod competitions;
pub mod db;
pub mod drones;
pub mod pilots;

pub use db::{init_database, is_unique_violation, Database};
