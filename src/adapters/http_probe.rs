//! HTTP speed probe built on reqwest.
//!
//! Measures latency with small round trips, then download and upload
//! throughput against a speed test server. The defaults point at the public
//! Cloudflare speed test endpoints.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;
use std::time::Instant;

use crate::config::ProbeConfig;
use crate::error::{classify_reqwest_error, ProbeError};
use crate::traits::{SpeedProbe, SpeedSample};

/// Convert a transfer of `bytes` over `secs` into megabits per second.
pub fn throughput_mbps(bytes: u64, secs: f64) -> f64 {
    let secs = secs.max(1e-6);
    (bytes as f64 * 8.0) / secs / 1_000_000.0
}

/// Speed probe that talks HTTP to a speed test server.
#[derive(Debug, Clone)]
pub struct HttpSpeedProbe {
    client: Client,
    config: ProbeConfig,
}

impl HttpSpeedProbe {
    /// Create a probe with a fresh reqwest client.
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a probe around an existing reqwest client.
    pub fn with_client(client: Client, config: ProbeConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Best round trip over `latency_samples` requests, in milliseconds.
    ///
    /// The first request doubles as the reachability check: if it fails the
    /// whole probe fails with `ConfigRetrieval`.
    async fn measure_latency(&self) -> Result<f64, ProbeError> {
        let url = &self.config.latency_url;
        let mut best: Option<f64> = None;

        for attempt in 0..self.config.latency_samples.max(1) {
            let start = Instant::now();
            let response = self.client.get(url).send().await.map_err(|e| {
                if attempt == 0 {
                    ProbeError::ConfigRetrieval {
                        url: url.clone(),
                        message: e.to_string(),
                    }
                } else {
                    classify_reqwest_error(&e, url)
                }
            })?;
            let status = response.status();
            if !status.is_success() {
                return Err(if attempt == 0 {
                    ProbeError::ConfigRetrieval {
                        url: url.clone(),
                        message: format!("HTTP {}", status.as_u16()),
                    }
                } else {
                    ProbeError::HttpStatus {
                        status: status.as_u16(),
                        url: url.clone(),
                    }
                });
            }
            // Drain the body so the connection can be reused for the next sample.
            let _ = response.bytes().await;

            let rtt = start.elapsed().as_secs_f64() * 1000.0;
            best = Some(best.map_or(rtt, |b: f64| b.min(rtt)));
        }

        Ok(best.unwrap_or(0.0))
    }

    async fn measure_download(&self) -> Result<f64, ProbeError> {
        let url = &self.config.download_url;
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, url))?;
        if !response.status().is_success() {
            return Err(ProbeError::HttpStatus {
                status: response.status().as_u16(),
                url: url.clone(),
            });
        }

        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| classify_reqwest_error(&e, url))?;
            received += chunk.len() as u64;
        }

        if received == 0 {
            return Err(ProbeError::EmptyTransfer {
                direction: "download",
            });
        }
        Ok(throughput_mbps(received, start.elapsed().as_secs_f64()))
    }

    async fn measure_upload(&self) -> Result<f64, ProbeError> {
        let url = &self.config.upload_url;
        let size = self.config.upload_bytes;
        if size == 0 {
            return Err(ProbeError::EmptyTransfer { direction: "upload" });
        }
        let payload = Bytes::from(vec![0u8; size as usize]);
        let start = Instant::now();

        let response = self
            .client
            .post(url)
            .header("content-type", "application/octet-stream")
            .body(payload)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, url))?;
        if !response.status().is_success() {
            return Err(ProbeError::HttpStatus {
                status: response.status().as_u16(),
                url: url.clone(),
            });
        }
        let _ = response.bytes().await;

        Ok(throughput_mbps(size, start.elapsed().as_secs_f64()))
    }
}

#[async_trait]
impl SpeedProbe for HttpSpeedProbe {
    async fn measure(&self) -> Result<SpeedSample, ProbeError> {
        let latency_ms = self.measure_latency().await?;
        let download_mbps = self.measure_download().await?;
        let upload_mbps = self.measure_upload().await?;

        tracing::debug!(
            download_mbps,
            upload_mbps,
            latency_ms,
            "speed probe finished"
        );

        Ok(SpeedSample {
            download_mbps,
            upload_mbps,
            latency_ms,
        })
    }
}

/// Probe used when speed testing is turned off. Always fails with
/// [`ProbeError::Disabled`], which the collector records as zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProbe;

#[async_trait]
impl SpeedProbe for DisabledProbe {
    async fn measure(&self) -> Result<SpeedSample, ProbeError> {
        Err(ProbeError::Disabled)
    }
}
