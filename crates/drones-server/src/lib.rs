//! Shared library surface for the drones server and its tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod state;
