//! Chaos injection wrapper for [`AdminTransport`].
//!
//! [`ChaosTransport`] wraps any `T: AdminTransport` and injects
//! configurable failures: random errors, per-host failures (keyed by
//! base URL), and latency. Used by the aggregation stress tests.

use crate::transport::AdminTransport;
use rand::Rng;
use shardadm_common::{HostStatus, TransportError};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

/// Configuration for transport chaos injection.
#[derive(Debug, Clone)]
pub struct ChaosConfig {
    /// Probability of returning an error \[0.0, 1.0\].
    pub failure_rate: f64,
    /// Fixed latency injected before forwarding.
    pub latency: Duration,
    /// Random additional latency in \[0, jitter\].
    pub jitter: Duration,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.0,
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }
}

/// An [`AdminTransport`] wrapper that injects chaos (failures, latency,
/// per-host blocks).
pub struct ChaosTransport<T: AdminTransport> {
    inner: Arc<T>,
    config: Arc<RwLock<ChaosConfig>>,
    /// Base URLs that are explicitly marked as failed.
    failed_bases: Arc<RwLock<HashSet<String>>>,
}

impl<T: AdminTransport> std::fmt::Debug for ChaosTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaosTransport").finish_non_exhaustive()
    }
}

impl<T: AdminTransport> ChaosTransport<T> {
    pub fn new(inner: T, config: ChaosConfig) -> Self {
        Self {
            inner: Arc::new(inner),
            config: Arc::new(RwLock::new(config)),
            failed_bases: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Mark a host (by base URL) as permanently failed (until recovered).
    pub async fn fail_base(&self, base: impl Into<String>) {
        self.failed_bases.write().await.insert(base.into());
    }

    /// Remove a host from the failed set.
    pub async fn recover_base(&self, base: &str) {
        self.failed_bases.write().await.remove(base);
    }

    /// Dynamically update the random failure rate.
    pub async fn set_failure_rate(&self, rate: f64) {
        self.config.write().await.failure_rate = rate;
    }

    /// Apply chaos checks: returns Err if the request should fail.
    async fn maybe_fail(&self, base: &str) -> Result<(), TransportError> {
        // Check explicit host failures
        {
            let failed = self.failed_bases.read().await;
            if failed.contains(base) {
                return Err(TransportError::Connect("chaos: host marked as failed".into()));
            }
        }

        // Read config
        let (delay, failure_rate) = {
            let config = self.config.read().await;
            let jitter_ms = if config.jitter.is_zero() {
                0
            } else {
                rand::thread_rng().gen_range(0..=config.jitter.as_millis() as u64)
            };
            let delay = config.latency + Duration::from_millis(jitter_ms);
            (delay, config.failure_rate)
        };

        // Inject latency
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        // Random failure
        if failure_rate > 0.0 && rand::thread_rng().gen_bool(failure_rate.min(1.0)) {
            return Err(TransportError::Connect("chaos: random failure".into()));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl<T: AdminTransport> AdminTransport for ChaosTransport<T> {
    async fn get(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError> {
        self.maybe_fail(base).await?;
        self.inner.get(base, path, query).await
    }

    async fn post(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError> {
        self.maybe_fail(base).await?;
        self.inner.post(base, path, query).await
    }
}

// ────────────────────────── Tests ──────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct OkTransport;

    #[async_trait::async_trait]
    impl AdminTransport for OkTransport {
        async fn get(
            &self,
            _base: &str,
            _path: &str,
            _query: &[(&str, String)],
        ) -> Result<HostStatus, TransportError> {
            Ok(HostStatus::new())
        }

        async fn post(
            &self,
            _base: &str,
            _path: &str,
            _query: &[(&str, String)],
        ) -> Result<HostStatus, TransportError> {
            Ok(HostStatus::new())
        }
    }

    #[tokio::test]
    async fn test_chaos_passthrough() {
        let chaos = ChaosTransport::new(OkTransport, ChaosConfig::default());
        assert!(chaos.get("http://h1", "/status", &[]).await.is_ok());
        assert!(chaos.post("http://h1", "/enable", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_chaos_fail_base() {
        let chaos = ChaosTransport::new(OkTransport, ChaosConfig::default());

        chaos.fail_base("http://h1").await;
        assert!(chaos.get("http://h1", "/status", &[]).await.is_err());
        assert!(chaos.post("http://h1", "/enable", &[]).await.is_err());

        // Other hosts still work
        assert!(chaos.get("http://h2", "/status", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_chaos_recover_base() {
        let chaos = ChaosTransport::new(OkTransport, ChaosConfig::default());

        chaos.fail_base("http://h1").await;
        assert!(chaos.get("http://h1", "/status", &[]).await.is_err());

        chaos.recover_base("http://h1").await;
        assert!(chaos.get("http://h1", "/status", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_chaos_random_failure() {
        let config = ChaosConfig {
            failure_rate: 1.0,
            ..Default::default()
        };
        let chaos = ChaosTransport::new(OkTransport, config);

        for _ in 0..10 {
            assert!(chaos.get("http://h1", "/status", &[]).await.is_err());
        }

        // Set back to 0
        chaos.set_failure_rate(0.0).await;
        assert!(chaos.get("http://h1", "/status", &[]).await.is_ok());
    }
}
