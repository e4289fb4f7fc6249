//! shardadm-admin: administrative operations for a replicated,
//! shard-aware cluster.
//!
//! The [`AdminClient`] issues control commands and inspection queries to
//! individual cluster members, and aggregates status across the whole
//! host set.
//!
//! ## Operations
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `set_leader` | Ask one host to become leader for a shard |
//! | `set_shard_enabled` | Toggle shard serving state on one host |
//! | `inspect_routing_uri` | Ask one host how it would route a request path |
//! | `host_status` | One host's local status, failures propagate |
//! | `service_status` | Concurrent status fan-out over every known host |
//!
//! Addressing comes from a [`Topology`] and the wire exchange from an
//! [`AdminTransport`]; both are constructor-injected traits. The reqwest
//! implementation of the transport lives in the `shardadm-http` crate.

pub mod chaos;
pub mod client;
pub mod status;
pub mod topology;
pub mod transport;

pub use client::{AdminClient, API_ENABLE, API_INSPECT_URI, API_SET_LEADER, API_STATUS};
pub use status::{AggregateStatus, HostOutcome};
pub use topology::Topology;
pub use transport::AdminTransport;
