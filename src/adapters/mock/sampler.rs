//! Scripted host sampler for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::SampleError;
use crate::traits::{HostSample, HostSampler, InterfaceState};

/// Host sampler that replays queued results.
///
/// Once the queue is empty the last successful sample is repeated, so a
/// collector can run for an arbitrary number of ticks. Clones share state,
/// which lets a test keep a handle after moving the sampler into a collector.
///
/// # Example
///
/// ```ignore
/// let sampler = ScriptedSampler::new(ScriptedSampler::host(5_000, 7_000, &[true]));
/// sampler.push_err(SampleError::MemoryUnavailable);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    queue: Arc<Mutex<VecDeque<Result<HostSample, SampleError>>>>,
    fallback: Arc<Mutex<HostSample>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedSampler {
    /// Create a sampler whose steady-state reading is `fallback`.
    pub fn new(fallback: HostSample) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(fallback)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Convenience constructor for a sample with fixed CPU/memory readings.
    pub fn host(bytes_sent: u64, bytes_recv: u64, links: &[bool]) -> HostSample {
        HostSample {
            cpu_percent: 12.5,
            mem_percent: 40.0,
            bytes_sent,
            bytes_recv,
            interfaces: links
                .iter()
                .enumerate()
                .map(|(i, up)| InterfaceState::new(format!("eth{}", i), *up))
                .collect(),
        }
    }

    /// Queue a successful sample.
    pub fn push(&self, sample: HostSample) {
        self.queue.lock().unwrap().push_back(Ok(sample));
    }

    /// Queue a failed sample.
    pub fn push_err(&self, err: SampleError) {
        self.queue.lock().unwrap().push_back(Err(err));
    }

    /// Number of times `sample` has been called.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl HostSampler for ScriptedSampler {
    async fn sample(&mut self) -> Result<HostSample, SampleError> {
        *self.calls.lock().unwrap() += 1;
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(Ok(sample)) => {
                *self.fallback.lock().unwrap() = sample.clone();
                Ok(sample)
            }
            Some(Err(err)) => Err(err),
            None => Ok(self.fallback.lock().unwrap().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_queue_then_repeats_last() {
        let mut sampler = ScriptedSampler::new(ScriptedSampler::host(1, 1, &[true]));
        sampler.push(ScriptedSampler::host(10, 20, &[false]));
        sampler.push_err(SampleError::MemoryUnavailable);

        assert_eq!(sampler.sample().await.unwrap().bytes_sent, 10);
        assert_eq!(sampler.sample().await, Err(SampleError::MemoryUnavailable));
        assert_eq!(sampler.sample().await.unwrap().bytes_sent, 10);
        assert_eq!(sampler.calls(), 3);
    }
}
