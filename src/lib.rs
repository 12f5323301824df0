//! netmon - host metrics collector
//!
//! Samples CPU, memory and network counters once per second, runs a periodic
//! speed probe, and appends one row per sample to an append-only CSV store.
//! This library exposes modules for use by the binary and integration tests.

pub mod adapters;
pub mod cli;
pub mod cli_output;
pub mod collector;
pub mod config;
pub mod error;
pub mod record;
pub mod store;
pub mod system;
pub mod traits;
