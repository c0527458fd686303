//! Service groups and the backend registry.
//!
//! # Responsibilities
//! - Group interchangeable backends under a typed group name
//! - Enforce group shape invariants at construction time
//! - Resolve group names to member sets for the distribution policy

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::config::{ConfigError, GatewayConfig};
use crate::registry::backend::{BackendDescriptor, Role};

/// Typed name of a service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupName {
    Auth,
    Orders,
    Restaurant,
}

impl GroupName {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupName::Auth => "auth",
            GroupName::Orders => "orders",
            GroupName::Restaurant => "restaurant",
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named set of backends interchangeable for one traffic class.
#[derive(Debug)]
pub struct ServiceGroup {
    pub name: GroupName,
    members: Vec<Arc<BackendDescriptor>>,
}

impl ServiceGroup {
    /// Build a single-member dedicated group.
    fn dedicated(name: GroupName, backend: BackendDescriptor) -> Result<Self, ConfigError> {
        if backend.role != Role::Dedicated {
            return Err(ConfigError::InvalidGroup {
                group: name.as_str(),
                reason: "dedicated group member must have role 'dedicated'",
            });
        }
        Ok(Self {
            name,
            members: vec![Arc::new(backend)],
        })
    }

    /// Build a primary/replica pair. Exactly one primary and one replica.
    fn replicated(
        name: GroupName,
        primary: BackendDescriptor,
        replica: BackendDescriptor,
    ) -> Result<Self, ConfigError> {
        if primary.role != Role::Primary || replica.role != Role::Replica {
            return Err(ConfigError::InvalidGroup {
                group: name.as_str(),
                reason: "replicated group requires exactly one primary and one replica",
            });
        }
        Ok(Self {
            name,
            members: vec![Arc::new(primary), Arc::new(replica)],
        })
    }

    pub fn members(&self) -> &[Arc<BackendDescriptor>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The sole member of a dedicated group.
    pub fn sole_member(&self) -> Option<&Arc<BackendDescriptor>> {
        match self.members.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// The authoritative member of a replicated group.
    pub fn primary(&self) -> Option<&Arc<BackendDescriptor>> {
        self.members.iter().find(|b| b.role == Role::Primary)
    }
}

/// Static resolution of group names to backend sets.
///
/// Built once from configuration; immutable for the process lifetime.
#[derive(Debug)]
pub struct BackendRegistry {
    auth: ServiceGroup,
    orders: ServiceGroup,
    restaurant: ServiceGroup,
}

impl BackendRegistry {
    /// Construct the registry, failing fast on any invalid upstream URL or
    /// violated group invariant. The process must not start listening if
    /// this returns an error.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let upstreams = &config.upstreams;

        let auth = ServiceGroup::dedicated(
            GroupName::Auth,
            BackendDescriptor::new(
                "auth",
                GroupName::Auth,
                upstreams.parse_url("auth", &upstreams.auth)?,
                Role::Dedicated,
            ),
        )?;
        let orders = ServiceGroup::dedicated(
            GroupName::Orders,
            BackendDescriptor::new(
                "orders",
                GroupName::Orders,
                upstreams.parse_url("orders", &upstreams.orders)?,
                Role::Dedicated,
            ),
        )?;
        let restaurant = ServiceGroup::replicated(
            GroupName::Restaurant,
            BackendDescriptor::new(
                "restaurant-primary",
                GroupName::Restaurant,
                upstreams.parse_url("restaurant-primary", &upstreams.restaurant_primary)?,
                Role::Primary,
            ),
            BackendDescriptor::new(
                "restaurant-replica",
                GroupName::Restaurant,
                upstreams.parse_url("restaurant-replica", &upstreams.restaurant_replica)?,
                Role::Replica,
            ),
        )?;

        Ok(Self {
            auth,
            orders,
            restaurant,
        })
    }

    /// Resolve a group name. Infallible: construction guarantees all three
    /// groups exist.
    pub fn resolve(&self, name: GroupName) -> &ServiceGroup {
        match name {
            GroupName::Auth => &self.auth,
            GroupName::Orders => &self.orders,
            GroupName::Restaurant => &self.restaurant,
        }
    }

    pub fn groups(&self) -> [&ServiceGroup; 3] {
        [&self.auth, &self.orders, &self.restaurant]
    }

    /// Effective topology as JSON, for the /health endpoint and the
    /// one-time startup log.
    pub fn topology(&self) -> serde_json::Value {
        let group_json = |g: &ServiceGroup| {
            json!({
                "members": g
                    .members()
                    .iter()
                    .map(|b| json!({
                        "name": b.name,
                        "url": b.base_url.as_str(),
                        "role": b.role,
                    }))
                    .collect::<Vec<_>>(),
            })
        };
        json!({
            "auth": group_json(&self.auth),
            "orders": group_json(&self.orders),
            "restaurant": group_json(&self.restaurant),
        })
    }
}
