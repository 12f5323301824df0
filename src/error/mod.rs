//! Error handling for netmon.
//!
//! The collector distinguishes three failure classes and reacts to each
//! differently:
//!
//! | Error | Source | Collector reaction |
//! |-------|--------|--------------------|
//! | [`ProbeError`] | network speed probe | absorbed, probe values reset to 0 |
//! | [`SampleError`] | OS counter read | tick skipped, loop continues |
//! | [`PersistenceError`] | metrics store I/O | loop stops, error returned from `join` |
//!
//! [`ConfigError`] covers configuration loading. [`NetmonError`] unifies all
//! of them with a category, an error code and a user-facing message.

mod category;
mod config;
mod netmon_error;
mod persistence;
mod probe;
mod result;
mod sample;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use netmon_error::NetmonError;
pub use persistence::{classify_io_error, PersistenceError};
pub use probe::{classify_reqwest_error, ProbeError};
pub use result::NetmonResult;
pub use sample::SampleError;
