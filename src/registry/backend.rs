//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream service instance
//! - Carry its role within a service group (dedicated, primary, replica)
//! - Pre-parse the base URL once at startup

use serde::Serialize;
use url::Url;

use crate::registry::group::GroupName;

/// Role of a backend within its service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sole member of a single-backend group; passthrough traffic only.
    Dedicated,
    /// Authoritative instance; all writes land here.
    Primary,
    /// Read-optimized mirror; may lag the primary, never accepts writes.
    Replica,
}

/// A single upstream service instance.
///
/// Immutable after startup; shared across requests via `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct BackendDescriptor {
    /// Unique backend identifier, used in logs and error payloads.
    pub name: String,
    /// Service group this backend belongs to.
    pub group: GroupName,
    /// Base URL (scheme + authority); http and https both supported.
    pub base_url: Url,
    /// Role within the owning group.
    pub role: Role,
}

impl BackendDescriptor {
    pub fn new(name: impl Into<String>, group: GroupName, base_url: Url, role: Role) -> Self {
        Self {
            name: name.into(),
            group,
            base_url,
            role,
        }
    }

    /// Target URL for a request: the backend's scheme/authority with the
    /// inbound path and query applied verbatim.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(query);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_url_preserves_path_and_query() {
        let backend = BackendDescriptor::new(
            "restaurant-primary",
            GroupName::Restaurant,
            Url::parse("http://localhost:3001").unwrap(),
            Role::Primary,
        );
        let url = backend.target_url("/api/restaurants/42", Some("expand=menu"));
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/restaurants/42?expand=menu"
        );
    }

    #[test]
    fn target_url_supports_https_upstreams() {
        let backend = BackendDescriptor::new(
            "auth",
            GroupName::Auth,
            Url::parse("https://auth.internal:8443").unwrap(),
            Role::Dedicated,
        );
        let url = backend.target_url("/api/auth/login", None);
        assert_eq!(url.as_str(), "https://auth.internal:8443/api/auth/login");
    }
}
