//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HostSampler`] - CPU, memory and network counter reads
//! - [`SpeedProbe`] - Network download/upload/latency measurement

pub mod probe;
pub mod sampler;

pub use probe::{SpeedProbe, SpeedSample};
pub use sampler::{HostSample, HostSampler, InterfaceState};
