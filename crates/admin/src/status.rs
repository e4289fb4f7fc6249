//! Aggregate status types: the per-host outcome sum type and the
//! order-preserving cluster snapshot.

use serde::ser::{Serialize, SerializeMap, Serializer};
use shardadm_common::{HostId, HostStatus};

/// Outcome of one host's status query within an aggregation.
///
/// Absence is a first-class state, distinct from a status payload that
/// reports the host as unhealthy: it means the query itself did not
/// succeed (unresolvable, unreachable, timed out, or bad response).
#[derive(Debug, Clone, PartialEq)]
pub enum HostOutcome {
    /// The host answered; its raw status payload, unmodified.
    Reachable(HostStatus),
    /// The host's query failed or timed out.
    Absent,
}

impl HostOutcome {
    /// Returns `true` if the host's query did not succeed.
    pub fn is_absent(&self) -> bool {
        matches!(self, HostOutcome::Absent)
    }

    /// The status payload, if the host answered.
    pub fn status(&self) -> Option<&HostStatus> {
        match self {
            HostOutcome::Reachable(status) => Some(status),
            HostOutcome::Absent => None,
        }
    }

    /// Consume the outcome, yielding the payload if the host answered.
    pub fn into_status(self) -> Option<HostStatus> {
        match self {
            HostOutcome::Reachable(status) => Some(status),
            HostOutcome::Absent => None,
        }
    }
}

/// Ordered mapping from host id to that host's status query outcome.
///
/// Key order matches the topology's host enumeration at the start of the
/// aggregation call, never completion order. The key set is exactly the
/// host set snapshotted at call start: failed hosts appear as
/// [`HostOutcome::Absent`], never dropped. Constructed fresh per call and
/// never mutated after return.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStatus {
    entries: Vec<(HostId, HostOutcome)>,
}

impl AggregateStatus {
    /// Build an aggregate from already-ordered entries.
    pub fn from_entries(entries: Vec<(HostId, HostOutcome)>) -> Self {
        Self { entries }
    }

    /// Number of hosts covered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for the degenerate aggregation over zero hosts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Host ids in report order.
    pub fn hosts(&self) -> impl Iterator<Item = &HostId> {
        self.entries.iter().map(|(host, _)| host)
    }

    /// Look up one host's outcome.
    pub fn get(&self, host: &HostId) -> Option<&HostOutcome> {
        self.entries
            .iter()
            .find(|(h, _)| h == host)
            .map(|(_, outcome)| outcome)
    }

    /// Iterate entries in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&HostId, &HostOutcome)> {
        self.entries.iter().map(|(host, outcome)| (host, outcome))
    }

    /// How many hosts were recorded absent.
    pub fn absent_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_absent()).count()
    }
}

/// Serializes as a JSON object in report order, with `null` for absent
/// hosts.
impl Serialize for AggregateStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (host, outcome) in &self.entries {
            match outcome {
                HostOutcome::Reachable(status) => map.serialize_entry(host, status)?,
                HostOutcome::Absent => map.serialize_entry(host, &())?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(role: &str) -> HostStatus {
        match json!({ "role": role }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn sample() -> AggregateStatus {
        AggregateStatus::from_entries(vec![
            (HostId::new("h1"), HostOutcome::Reachable(payload("leader"))),
            (HostId::new("h2"), HostOutcome::Absent),
            (HostId::new("h3"), HostOutcome::Reachable(payload("follower"))),
        ])
    }

    #[test]
    fn test_lookup_and_counts() {
        let agg = sample();
        assert_eq!(agg.len(), 3);
        assert!(!agg.is_empty());
        assert_eq!(agg.absent_count(), 1);
        assert!(agg.get(&HostId::new("h2")).unwrap().is_absent());
        assert_eq!(
            agg.get(&HostId::new("h1")).unwrap().status(),
            Some(&payload("leader"))
        );
        assert!(agg.get(&HostId::new("h4")).is_none());
    }

    #[test]
    fn test_hosts_in_report_order() {
        let agg = sample();
        let hosts: Vec<&str> = agg.hosts().map(HostId::as_str).collect();
        assert_eq!(hosts, vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_serializes_in_order_with_null_for_absent() {
        let agg = sample();
        assert_eq!(
            serde_json::to_string(&agg).unwrap(),
            r#"{"h1":{"role":"leader"},"h2":null,"h3":{"role":"follower"}}"#
        );
    }

    #[test]
    fn test_empty_aggregate_serializes_as_empty_object() {
        let agg = AggregateStatus::from_entries(vec![]);
        assert!(agg.is_empty());
        assert_eq!(serde_json::to_string(&agg).unwrap(), "{}");
    }

    #[test]
    fn test_outcome_into_status() {
        assert_eq!(
            HostOutcome::Reachable(payload("leader")).into_status(),
            Some(payload("leader"))
        );
        assert_eq!(HostOutcome::Absent.into_status(), None);
    }
}
