//! Metrics and tracing setup for shardadm.
//!
//! Provides a global [`AdminMetrics`] singleton backed by the `prometheus`
//! crate. Counters are incremented by the HTTP transport and the status
//! aggregator; embedding applications can scrape the registry or use
//! [`encode_metrics`] for the text exposition format.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// ────────────────────────── Tracing ──────────────────────────

/// Initialize the tracing subscriber with env-filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

// ────────────────────────── Prometheus metrics ──────────────────────────

/// Global metrics instance.
static METRICS: OnceLock<AdminMetrics> = OnceLock::new();

/// Retrieve (or lazily create) the global metrics singleton.
pub fn metrics() -> &'static AdminMetrics {
    METRICS.get_or_init(AdminMetrics::new)
}

/// All Prometheus metrics for the shardadm client.
pub struct AdminMetrics {
    pub registry: Registry,

    // ── Transport counters ──
    pub requests_sent: IntCounterVec,
    pub requests_failed: IntCounterVec,

    // ── Aggregation counters ──
    pub aggregations: IntCounter,
    pub hosts_absent: IntCounter,
}

// Manual Debug impl because prometheus types don't derive Debug.
impl std::fmt::Debug for AdminMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminMetrics").finish_non_exhaustive()
    }
}

impl AdminMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let requests_sent = IntCounterVec::new(
            Opts::new(
                "shardadm_requests_sent_total",
                "Admin API requests sent, by HTTP method",
            ),
            &["method"],
        )
        .expect("requests_sent counter vec");
        let requests_failed = IntCounterVec::new(
            Opts::new(
                "shardadm_requests_failed_total",
                "Admin API requests that failed, by HTTP method",
            ),
            &["method"],
        )
        .expect("requests_failed counter vec");

        let aggregations = IntCounter::with_opts(Opts::new(
            "shardadm_aggregations_total",
            "Cluster-wide status aggregations performed",
        ))
        .expect("aggregations counter");
        let hosts_absent = IntCounter::with_opts(Opts::new(
            "shardadm_hosts_absent_total",
            "Hosts recorded absent during status aggregation",
        ))
        .expect("hosts_absent counter");

        // Register all metrics
        registry
            .register(Box::new(requests_sent.clone()))
            .expect("register requests_sent");
        registry
            .register(Box::new(requests_failed.clone()))
            .expect("register requests_failed");
        registry
            .register(Box::new(aggregations.clone()))
            .expect("register aggregations");
        registry
            .register(Box::new(hosts_absent.clone()))
            .expect("register hosts_absent");

        Self {
            registry,
            requests_sent,
            requests_failed,
            aggregations,
            hosts_absent,
        }
    }
}

/// Encode all registered metrics in Prometheus text exposition format.
pub fn encode_metrics() -> String {
    let m = metrics();
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    encoder
        .encode(&m.registry.gather(), &mut buf)
        .expect("prometheus text encoding");
    String::from_utf8(buf).expect("prometheus output is valid UTF-8")
}

// ────────────────────────── Tests ──────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_init_and_increment() {
        let m = metrics();

        let before = m.aggregations.get();
        m.aggregations.inc();
        m.aggregations.inc();
        assert_eq!(m.aggregations.get(), before + 2);

        m.requests_sent.with_label_values(&["get"]).inc();
        m.requests_sent.with_label_values(&["post"]).inc();
        m.requests_failed.with_label_values(&["get"]).inc();
    }

    #[test]
    fn test_encode_metrics_format() {
        // Ensure at least one counter is incremented
        metrics().hosts_absent.inc();

        let output = encode_metrics();
        assert!(output.contains("shardadm_aggregations_total"));
        assert!(output.contains("shardadm_hosts_absent_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }
}
