//! Host-level helpers that sit below the samplers.
//!
//! - [`link`] decides whether an interface is administratively up
//! - [`traffic`] turns cumulative byte counters into per-second rates

pub mod link;
pub mod traffic;

pub use link::interface_is_up;
pub use traffic::{format_size, TrafficMonitor, TrafficRate, DEFAULT_RATE_THRESHOLD};
