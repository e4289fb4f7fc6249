//! The admin client: point operations against individual hosts plus the
//! cluster-wide status aggregation.
//!
//! Point operations (`set_leader`, `set_shard_enabled`,
//! `inspect_routing_uri`, `host_status`) are one network round trip each:
//! no retry, no interpretation, every failure surfaced to the caller.
//! `service_status` is the fan-out path: one concurrent status query per
//! known host, each failure isolated to its own host.

use crate::status::{AggregateStatus, HostOutcome};
use crate::topology::Topology;
use crate::transport::AdminTransport;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use shardadm_common::{AdminError, HostId, HostStatus, ShardId};
use shardadm_config::ClusterConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Endpoint paths on each host's admin API.
pub const API_SET_LEADER: &str = "/api/admin/v1/local/set_leader";
pub const API_ENABLE: &str = "/api/admin/v1/local/enable";
pub const API_STATUS: &str = "/api/admin/v1/local/status";
pub const API_INSPECT_URI: &str = "/api/admin/v1/local/inspect_uri";

/// Admin client for a replicated, shard-aware cluster.
///
/// Generic over `P: Topology` and `T: AdminTransport` for testability —
/// deployment uses a config-backed topology with `HttpTransport`; tests
/// use in-memory fakes. Holds no other state: every call resolves and
/// queries fresh.
pub struct AdminClient<P: Topology, T: AdminTransport> {
    topology: Arc<P>,
    transport: Arc<T>,
    status_timeout: Duration,
}

impl<P: Topology, T: AdminTransport> std::fmt::Debug for AdminClient<P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("status_timeout", &self.status_timeout)
            .finish_non_exhaustive()
    }
}

impl<T: AdminTransport> AdminClient<ClusterConfig, T> {
    /// Build a config-backed client, taking the status query deadline
    /// from the configuration.
    pub fn from_config(config: Arc<ClusterConfig>, transport: Arc<T>) -> Self {
        let status_timeout = config.status_timeout();
        Self::new(config, transport, status_timeout)
    }
}

impl<P: Topology, T: AdminTransport> AdminClient<P, T> {
    /// Create a client from injected topology and transport.
    ///
    /// `status_timeout` bounds each per-host query during
    /// `service_status`; point operations rely on the transport's own
    /// deadline.
    pub fn new(topology: Arc<P>, transport: Arc<T>, status_timeout: Duration) -> Self {
        Self {
            topology,
            transport,
            status_timeout,
        }
    }

    // -----------------------------------------------------------------------
    // Point operations
    // -----------------------------------------------------------------------

    /// Ask `host` to become leader for `shard`.
    ///
    /// Returns the raw response payload; any resolution or transport
    /// failure propagates unmodified.
    pub async fn set_leader(
        &self,
        host: &HostId,
        shard: &ShardId,
    ) -> Result<HostStatus, AdminError> {
        let base = self.topology.resolve(host)?;
        let result = self
            .transport
            .post(
                &base,
                API_SET_LEADER,
                &[("shard_id", shard.as_str().to_string())],
            )
            .await?;
        Ok(result)
    }

    /// Toggle whether `host` serves `shard`.
    pub async fn set_shard_enabled(
        &self,
        host: &HostId,
        shard: &ShardId,
        enabled: bool,
    ) -> Result<HostStatus, AdminError> {
        let base = self.topology.resolve(host)?;
        let result = self
            .transport
            .post(
                &base,
                API_ENABLE,
                &[
                    ("shard_id", shard.as_str().to_string()),
                    ("enabled", enabled.to_string()),
                ],
            )
            .await?;
        Ok(result)
    }

    /// Ask `host` how it would route a request for `uri`. Diagnostic
    /// only, mutates nothing.
    pub async fn inspect_routing_uri(
        &self,
        host: &HostId,
        uri: &str,
    ) -> Result<HostStatus, AdminError> {
        let base = self.topology.resolve(host)?;
        let result = self
            .transport
            .get(&base, API_INSPECT_URI, &[("request_uri", uri.to_string())])
            .await?;
        Ok(result)
    }

    /// One host's local status. Semantically one unit of the aggregation
    /// below, but performed alone: failures propagate to the caller
    /// instead of becoming absence.
    pub async fn host_status(&self, host: &HostId) -> Result<HostStatus, AdminError> {
        let base = self.topology.resolve(host)?;
        let result = self.transport.get(&base, API_STATUS, &[]).await?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Status aggregation
    // -----------------------------------------------------------------------

    /// Query every known host's status concurrently and assemble one
    /// [`AggregateStatus`] covering all of them.
    ///
    /// The host set is snapshotted once from the topology; a failed
    /// snapshot is the only way this call fails. Each host's query runs
    /// independently, bounded by the configured status timeout; any
    /// per-host failure (resolution, connect, non-success status, bad
    /// body, timeout) is logged as a warning and recorded as
    /// [`HostOutcome::Absent`]. No query's outcome affects any other
    /// host's entry, and the result covers every snapshotted host in
    /// snapshot order regardless of completion order.
    pub async fn service_status(&self) -> Result<AggregateStatus, AdminError> {
        let hosts = self.topology.host_ids()?;
        shardadm_metrics::metrics().aggregations.inc();

        let mut outcomes: HashMap<HostId, HostOutcome> = HashMap::with_capacity(hosts.len());
        let mut queries = FuturesUnordered::new();

        for host in &hosts {
            let base = match self.topology.resolve(host) {
                Ok(base) => base,
                Err(e) => {
                    tracing::warn!(host = %host, "cannot get status for host: {}", e);
                    outcomes.insert(host.clone(), HostOutcome::Absent);
                    continue;
                }
            };

            let transport = self.transport.clone();
            let timeout = self.status_timeout;
            let handle = tokio::spawn(async move {
                tokio::time::timeout(timeout, transport.get(&base, API_STATUS, &[])).await
            });
            // The host id stays outside the spawned task so it is still
            // known if the task panics.
            let host = host.clone();
            queries.push(async move { (host, handle.await) });
        }

        // Single join point: completions funnel through this drain loop
        // in whatever order the queries settle. Every query is awaited;
        // there is no early exit on first success or first failure.
        while let Some((host, joined)) = queries.next().await {
            match joined {
                Ok(Ok(Ok(status))) => {
                    outcomes.insert(host, HostOutcome::Reachable(status));
                }
                Ok(Ok(Err(e))) => {
                    tracing::warn!(host = %host, "cannot get status for host: {}", e);
                    outcomes.insert(host, HostOutcome::Absent);
                }
                Ok(Err(_elapsed)) => {
                    tracing::warn!(
                        host = %host,
                        "status query timed out after {:?}",
                        self.status_timeout
                    );
                    outcomes.insert(host, HostOutcome::Absent);
                }
                Err(e) => {
                    tracing::warn!(host = %host, "status query task failed: {}", e);
                    outcomes.insert(host, HostOutcome::Absent);
                }
            }
        }

        // Assemble in snapshot order: one entry per snapshotted host,
        // absent for anything that never produced an outcome.
        let entries: Vec<(HostId, HostOutcome)> = hosts
            .into_iter()
            .map(|host| {
                let outcome = outcomes.remove(&host).unwrap_or(HostOutcome::Absent);
                (host, outcome)
            })
            .collect();

        let absent = entries.iter().filter(|(_, o)| o.is_absent()).count();
        if absent > 0 {
            shardadm_metrics::metrics().hosts_absent.inc_by(absent as u64);
        }

        Ok(AggregateStatus::from_entries(entries))
    }
}
