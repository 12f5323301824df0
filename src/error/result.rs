//! Result type alias for netmon operations.

use super::netmon_error::NetmonError;

/// Type alias for Results using NetmonError.
///
/// # Example
///
/// ```ignore
/// use netmon::error::NetmonResult;
///
/// async fn run(config: CollectorConfig) -> NetmonResult<u64> {
///     let handle = Collector::from_config(config).start();
///     handle.join().await
/// }
/// ```
pub type NetmonResult<T> = Result<T, NetmonError>;
