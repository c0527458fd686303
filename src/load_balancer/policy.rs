//! Backend selection per traffic kind.
//!
//! # Responsibilities
//! - Passthrough: return the group's sole dedicated member
//! - Write: return the primary, ignoring the rotation cursor
//! - Read: round-robin across the group, honoring exclusions
//!
//! # Consistency rule
//! All writes observe primary-only semantics; reads may observe a backend
//! up to one distribution cycle stale relative to the latest write. This
//! is the one correctness guarantee the gateway enforces.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::registry::{BackendDescriptor, ServiceGroup};
use crate::routing::TrafficKind;

/// Chooses a backend within a service group.
///
/// Owns the rotation cursor for read traffic; one instance is shared by
/// all requests for the process lifetime.
#[derive(Debug, Default)]
pub struct DistributionPolicy {
    /// Next round-robin start position for the restaurant group.
    /// Single cursor today; a cursor-per-group map becomes necessary only
    /// if a second multi-member group is ever configured.
    cursor: AtomicUsize,
}

impl DistributionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select one member of `group` for a request of the given kind,
    /// skipping any backend named in `excluding`.
    pub fn select(
        &self,
        group: &ServiceGroup,
        kind: TrafficKind,
        excluding: &[&str],
    ) -> Result<Arc<BackendDescriptor>, GatewayError> {
        let candidate = match kind {
            TrafficKind::Passthrough => group
                .sole_member()
                .filter(|b| !is_excluded(b, excluding))
                .cloned(),
            TrafficKind::Write => group
                .primary()
                .filter(|b| !is_excluded(b, excluding))
                .cloned(),
            TrafficKind::Read => self.next_read_candidate(group, excluding),
        };
        candidate.ok_or(GatewayError::NoAvailableBackend { group: group.name })
    }

    /// Round-robin scan starting at the cursor position. The cursor
    /// advances exactly once per call, even when the member at the start
    /// position is excluded, so long-run fairness survives failover.
    fn next_read_candidate(
        &self,
        group: &ServiceGroup,
        excluding: &[&str],
    ) -> Option<Arc<BackendDescriptor>> {
        let members = group.members();
        if members.is_empty() {
            return None;
        }
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        (0..members.len())
            .map(|i| &members[(start + i) % members.len()])
            .find(|b| !is_excluded(b, excluding))
            .cloned()
    }
}

fn is_excluded(backend: &BackendDescriptor, excluding: &[&str]) -> bool {
    excluding.contains(&backend.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::registry::{BackendRegistry, GroupName, Role};

    fn registry() -> BackendRegistry {
        BackendRegistry::from_config(&GatewayConfig::default()).unwrap()
    }

    #[test]
    fn reads_alternate_between_primary_and_replica() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        let picks: Vec<String> = (0..4)
            .map(|_| policy.select(group, TrafficKind::Read, &[]).unwrap().name.clone())
            .collect();
        assert_eq!(
            picks,
            [
                "restaurant-primary",
                "restaurant-replica",
                "restaurant-primary",
                "restaurant-replica"
            ]
        );
    }

    #[test]
    fn writes_always_pin_to_primary() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        // Spin the cursor to arbitrary positions between writes.
        for _ in 0..5 {
            let write = policy.select(group, TrafficKind::Write, &[]).unwrap();
            assert_eq!(write.role, Role::Primary);
            policy.select(group, TrafficKind::Read, &[]).unwrap();
        }
    }

    #[test]
    fn passthrough_returns_sole_member() {
        let registry = registry();
        let policy = DistributionPolicy::new();
        let auth = policy
            .select(registry.resolve(GroupName::Auth), TrafficKind::Passthrough, &[])
            .unwrap();
        assert_eq!(auth.name, "auth");
        assert_eq!(auth.role, Role::Dedicated);
    }

    #[test]
    fn excluded_backend_is_skipped_for_reads() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        // Cursor starts at primary, but primary is excluded.
        let pick = policy
            .select(group, TrafficKind::Read, &["restaurant-primary"])
            .unwrap();
        assert_eq!(pick.name, "restaurant-replica");
    }

    #[test]
    fn exhausted_group_yields_no_available_backend() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        let err = policy
            .select(
                group,
                TrafficKind::Read,
                &["restaurant-primary", "restaurant-replica"],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::NoAvailableBackend {
                group: GroupName::Restaurant
            }
        ));
    }

    #[test]
    fn excluded_primary_blocks_writes_entirely() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        // No write fallback: excluding the primary leaves nothing.
        let err = policy
            .select(group, TrafficKind::Write, &["restaurant-primary"])
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoAvailableBackend { .. }));
    }

    #[test]
    fn cursor_advances_even_when_selection_is_excluded() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        // First call starts at primary but is forced to the replica.
        policy
            .select(group, TrafficKind::Read, &["restaurant-primary"])
            .unwrap();
        // The cursor still moved past the primary slot.
        let next = policy.select(group, TrafficKind::Read, &[]).unwrap();
        assert_eq!(next.name, "restaurant-replica");
    }

    #[test]
    fn long_run_distribution_is_even() {
        let registry = registry();
        let group = registry.resolve(GroupName::Restaurant);
        let policy = DistributionPolicy::new();

        let mut primary_hits = 0;
        for _ in 0..1000 {
            if policy.select(group, TrafficKind::Read, &[]).unwrap().role == Role::Primary {
                primary_hits += 1;
            }
        }
        assert_eq!(primary_hits, 500);
    }
}
