//! Host enumeration and address resolution.

use shardadm_common::{AdminError, HostId};
use shardadm_config::ClusterConfig;

/// Source of cluster membership and addressing.
///
/// The aggregator snapshots `host_ids` once at call start and never
/// re-consults topology mid-call. Implementations are config-backed in
/// deployment and fakes in tests.
pub trait Topology: Send + Sync + 'static {
    /// Ordered snapshot of every known host.
    fn host_ids(&self) -> Result<Vec<HostId>, AdminError>;

    /// Base URL of one host's admin API.
    fn resolve(&self, host: &HostId) -> Result<String, AdminError>;
}

impl Topology for ClusterConfig {
    fn host_ids(&self) -> Result<Vec<HostId>, AdminError> {
        Ok(ClusterConfig::host_ids(self))
    }

    fn resolve(&self, host: &HostId) -> Result<String, AdminError> {
        self.base_url(host)
            .map(str::to_string)
            .ok_or_else(|| AdminError::Resolution(host.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClusterConfig {
        shardadm_config::load_from_str(
            r#"
hosts:
  - id: host1
    url: "http://127.0.0.1:8080"
  - id: host2
    url: "http://127.0.0.1:8081"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_config_backed_host_order() {
        let topo = config();
        let ids = Topology::host_ids(&topo).unwrap();
        assert_eq!(ids, vec![HostId::new("host1"), HostId::new("host2")]);
    }

    #[test]
    fn test_config_backed_resolution() {
        let topo = config();
        let url = topo.resolve(&HostId::new("host2")).unwrap();
        assert_eq!(url, "http://127.0.0.1:8081");
    }

    #[test]
    fn test_unknown_host_is_resolution_error() {
        let topo = config();
        let err = topo.resolve(&HostId::new("ghost")).unwrap_err();
        match err {
            AdminError::Resolution(host) => assert_eq!(host, HostId::new("ghost")),
            other => panic!("expected Resolution error, got {:?}", other),
        }
    }
}
