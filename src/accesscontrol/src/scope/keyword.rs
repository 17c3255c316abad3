/// Keyword resolver registry
///
/// Maps exact scope strings such as `orgs:current` to functions computing a
/// concrete scope from the caller's identity alone.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::builder::scope;
use crate::error::Result;
use crate::types::CallerIdentity;

/// Scope keyword for the caller's current organization
pub const ORGS_CURRENT: &str = "orgs:current";

/// Scope keyword for the caller themselves
pub const USERS_SELF: &str = "users:self";

/// Resolves a keyword scope from the caller's identity
pub trait KeywordResolver: Send + Sync {
    /// Compute the concrete scope for `identity`
    fn resolve(&self, identity: &CallerIdentity) -> Result<String>;
}

impl<F> KeywordResolver for F
where
    F: Fn(&CallerIdentity) -> Result<String> + Send + Sync,
{
    fn resolve(&self, identity: &CallerIdentity) -> Result<String> {
        self(identity)
    }
}

/// `orgs:current` → `orgs:id:<org_id>`
pub fn resolve_current_org(identity: &CallerIdentity) -> Result<String> {
    Ok(scope(["orgs", "id", &identity.org_id.to_string()]))
}

/// `users:self` → `users:id:<user_id>`
pub fn resolve_user_self(identity: &CallerIdentity) -> Result<String> {
    Ok(scope(["users", "id", &identity.user_id.to_string()]))
}

/// Exact-match registry of keyword resolvers
///
/// Registration happens at startup; lookups are frequent and concurrent.
pub struct KeywordRegistry {
    resolvers: RwLock<HashMap<String, Arc<dyn KeywordResolver>>>,
}

impl KeywordRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            resolvers: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with `orgs:current` and `users:self` registered
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(ORGS_CURRENT, resolve_current_org);
        registry.register(USERS_SELF, resolve_user_self);
        registry
    }

    /// Registers a resolver for an exact scope; last writer wins
    pub fn register<R>(&self, keyword: impl Into<String>, resolver: R)
    where
        R: KeywordResolver + 'static,
    {
        self.resolvers.write().insert(keyword.into(), Arc::new(resolver));
    }

    /// Resolver registered for exactly `scope`, if any
    pub fn get(&self, scope: &str) -> Option<Arc<dyn KeywordResolver>> {
        self.resolvers.read().get(scope).cloned()
    }

    /// Registered keywords, sorted
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = self.resolvers.read().keys().cloned().collect();
        keywords.sort();
        keywords
    }

    /// Number of registered keywords
    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    /// Whether no keywords are registered
    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
