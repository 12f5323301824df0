//! Mock implementations for testing.
//!
//! These let the collector run without touching real OS counters or the
//! network.
//!
//! # Available Mocks
//!
//! - [`ScriptedSampler`] - Host sampler replaying queued samples
//! - [`ScriptedProbe`] - Speed probe replaying queued results

pub mod probe;
pub mod sampler;

pub use probe::ScriptedProbe;
pub use sampler::ScriptedSampler;
