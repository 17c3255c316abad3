//! Core access control types

use serde::{Deserialize, Serialize};

/// Unique user identifier
pub type UserId = i64;

/// Unique organization identifier
pub type OrgId = i64;

/// The signed-in principal a scope is resolved for
///
/// Supplied by the surrounding system per request and never mutated during
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Signed-in user
    pub user_id: UserId,

    /// Organization the user is currently acting in
    pub org_id: OrgId,
}

impl CallerIdentity {
    /// Create a new caller identity
    pub fn new(user_id: UserId, org_id: OrgId) -> Self {
        Self { user_id, org_id }
    }
}

/// An (action, scope) pair granted to a caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Action name (e.g., "datasources:query", "users:read")
    pub action: String,

    /// Scope the action applies to (e.g., "users:self", "datasources:id:7")
    #[serde(default)]
    pub scope: String,
}

impl Permission {
    /// Create a new permission
    pub fn new(action: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            scope: scope.into(),
        }
    }

    /// Copy of this permission with the scope replaced
    pub fn with_scope(&self, scope: impl Into<String>) -> Self {
        Self {
            action: self.action.clone(),
            scope: scope.into(),
        }
    }
}
