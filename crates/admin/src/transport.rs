//! Abstraction over the request/response exchange with a host's admin API.

use shardadm_common::{HostStatus, TransportError};

/// One request/response exchange against a host's admin API.
///
/// Same pattern as the rest of the workspace: a trait in the domain
/// crate, with the reqwest implementation in `shardadm-http` and
/// in-memory fakes in tests. The consumed API is path-routed with query
/// parameters and JSON-object bodies; no retries, no interpretation of
/// the payload.
#[async_trait::async_trait]
pub trait AdminTransport: Send + Sync + 'static {
    /// GET `base` + `path` with the given query parameters.
    async fn get(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError>;

    /// POST to `base` + `path` with the given query parameters and an
    /// empty body.
    async fn post(
        &self,
        base: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HostStatus, TransportError>;
}
