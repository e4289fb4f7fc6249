//! shardadm-common: shared types for the shardadm project.
//!
//! Provides the opaque `HostId` / `ShardId` identifiers used to name
//! cluster members and shards, the pass-through `HostStatus` payload,
//! and the error taxonomy shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// HostId
// ---------------------------------------------------------------------------

/// Opaque identifier naming one addressable member process of the cluster.
///
/// Host ids come from the cluster topology and are never interpreted by
/// this client beyond equality and display.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    /// Create a `HostId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostId({})", self.0)
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// ShardId
// ---------------------------------------------------------------------------

/// Opaque identifier naming a shard hosted by one or more cluster members.
///
/// Used only as a query parameter on admin operations.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShardId(String);

impl ShardId {
    /// Create a `ShardId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShardId({})", self.0)
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ShardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// HostStatus
// ---------------------------------------------------------------------------

/// One host's self-reported local state (Raft role, log position, enabled
/// shards, ...). The payload is passed through verbatim and never
/// interpreted by this client.
pub type HostStatus = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failure of a single request/response exchange against one host.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("non-success HTTP status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Deserialize(String),
}

/// A failure of an admin operation.
///
/// Point operations surface all of these to the caller unmodified. The
/// status aggregation converts `Resolution` and `Transport` into per-host
/// absence; only `Topology` fails an aggregation outright.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("cannot resolve address for host {0}")]
    Resolution(HostId),

    #[error("cluster topology unavailable: {0}")]
    Topology(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_id_display_and_debug() {
        let id = HostId::new("host1");
        assert_eq!(format!("{}", id), "host1");
        assert_eq!(format!("{:?}", id), "HostId(host1)");
        assert_eq!(id.as_str(), "host1");
    }

    #[test]
    fn test_host_id_equality_and_conversion() {
        let a: HostId = "h1".into();
        let b = HostId::new(String::from("h1"));
        assert_eq!(a, b);
        assert_ne!(a, HostId::new("h2"));
    }

    #[test]
    fn test_shard_id_display() {
        let id = ShardId::new("shard1");
        assert_eq!(format!("{}", id), "shard1");
        assert_eq!(format!("{:?}", id), "ShardId(shard1)");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let host = HostId::new("h1");
        assert_eq!(serde_json::to_string(&host).unwrap(), "\"h1\"");
        let back: HostId = serde_json::from_str("\"h1\"").unwrap();
        assert_eq!(back, host);

        let shard = ShardId::new("s1");
        assert_eq!(serde_json::to_string(&shard).unwrap(), "\"s1\"");
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = AdminError::Resolution(HostId::new("h9"));
        assert!(err.to_string().contains("h9"));

        let err = AdminError::Transport(TransportError::Status(503));
        assert!(err.to_string().contains("503"));

        let err = AdminError::Topology("config missing".into());
        assert!(err.to_string().contains("config missing"));
    }
}
