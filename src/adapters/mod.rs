//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`SysinfoSampler`] - Host counters via `sysinfo`
//! - [`HttpSpeedProbe`] - Speed test over HTTP via `reqwest`
//! - [`DisabledProbe`] - Probe that always reports "disabled"
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::ScriptedSampler`] - Queued host samples
//! - [`mock::ScriptedProbe`] - Queued probe results

pub mod http_probe;
pub mod mock;
pub mod sysinfo_sampler;

pub use http_probe::{throughput_mbps, DisabledProbe, HttpSpeedProbe};
pub use mock::{ScriptedProbe, ScriptedSampler};
pub use sysinfo_sampler::SysinfoSampler;
