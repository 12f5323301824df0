//! Scripted speed probe for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::ProbeError;
use crate::traits::{SpeedProbe, SpeedSample};

/// Speed probe that replays queued results.
///
/// When the queue runs dry every call fails with `ProbeError::Other`, which
/// keeps unexpected probe runs visible in assertions. An optional delay
/// simulates a slow server for timeout tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    queue: Arc<Mutex<VecDeque<Result<SpeedSample, ProbeError>>>>,
    calls: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every measurement by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful measurement.
    pub fn push_ok(&self, download_mbps: f64, upload_mbps: f64, latency_ms: f64) {
        self.queue.lock().unwrap().push_back(Ok(SpeedSample {
            download_mbps,
            upload_mbps,
            latency_ms,
        }));
    }

    /// Queue a failed measurement.
    pub fn push_err(&self, err: ProbeError) {
        self.queue.lock().unwrap().push_back(Err(err));
    }

    /// Number of times `measure` has been called.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SpeedProbe for ScriptedProbe {
    async fn measure(&self) -> Result<SpeedSample, ProbeError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(ProbeError::Other {
                message: "no scripted result".to_string(),
            })
        })
    }
}
