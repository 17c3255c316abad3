/// Attribute resolver registry
///
/// Maps scope prefixes such as `datasources:name:` to resolvers that turn an
/// attribute-based scope into an id-based one, usually through an external
/// lookup.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use super::builder::SEPARATOR;
use crate::context::RequestContext;
use crate::error::{AccessControlError, Result};
use crate::types::CallerIdentity;

/// Resolves a scope whose prefix it was registered under
///
/// Implementations may perform I/O and are called concurrently; they must be
/// idempotent for a given (identity, scope) pair.
#[async_trait]
pub trait AttributeResolver: Send + Sync {
    /// Compute the concrete scope for `scope` on behalf of `identity`
    async fn resolve(
        &self,
        ctx: &RequestContext,
        identity: &CallerIdentity,
        scope: &str,
    ) -> Result<String>;
}

/// Attribute resolver backed by an async closure
pub struct FnAttributeResolver<F> {
    f: F,
}

/// Wrap an async closure taking owned `(ctx, identity, scope)` as a resolver
///
/// ```
/// use accesscontrol::scope::attribute_resolver_fn;
/// use accesscontrol::{CallerIdentity, RequestContext};
///
/// let resolver = attribute_resolver_fn(
///     |ctx: RequestContext, identity: CallerIdentity, scope: String| async move {
///         Ok::<_, accesscontrol::AccessControlError>(format!(
///             "{}@{} ({})",
///             scope, identity.org_id, ctx.request_id
///         ))
///     },
/// );
/// # let _ = resolver;
/// ```
pub fn attribute_resolver_fn<F, Fut>(f: F) -> FnAttributeResolver<F>
where
    F: Fn(RequestContext, CallerIdentity, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    FnAttributeResolver { f }
}

#[async_trait]
impl<F, Fut> AttributeResolver for FnAttributeResolver<F>
where
    F: Fn(RequestContext, CallerIdentity, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn resolve(
        &self,
        ctx: &RequestContext,
        identity: &CallerIdentity,
        scope: &str,
    ) -> Result<String> {
        (self.f)(ctx.clone(), identity.clone(), scope.to_string()).await
    }
}

/// Prefix-keyed registry of attribute resolvers
pub struct AttributeRegistry {
    resolvers: RwLock<HashMap<String, Arc<dyn AttributeResolver>>>,
}

impl AttributeRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            resolvers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a resolver for a scope prefix; last writer wins
    ///
    /// The prefix must have the shape `scope_prefix` produces for a
    /// multi-segment scope, i.e. end in `:`. Anything else, including the
    /// empty prefix of single-segment scopes, is rejected.
    pub fn register<R>(&self, prefix: impl Into<String>, resolver: R) -> Result<()>
    where
        R: AttributeResolver + 'static,
    {
        let prefix = prefix.into();
        if !prefix.ends_with(SEPARATOR) {
            warn!("Rejecting attribute resolver prefix {:?}: must end with ':'", prefix);
            return Err(AccessControlError::Configuration(format!(
                "attribute resolver prefix {:?} must end with '{}'",
                prefix, SEPARATOR
            )));
        }
        self.resolvers.write().insert(prefix, Arc::new(resolver));
        Ok(())
    }

    /// Resolver registered under `prefix`, if any
    pub fn get(&self, prefix: &str) -> Option<Arc<dyn AttributeResolver>> {
        self.resolvers.read().get(prefix).cloned()
    }

    /// Registered prefixes, sorted
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = self.resolvers.read().keys().cloned().collect();
        prefixes.sort();
        prefixes
    }

    /// Number of registered prefixes
    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    /// Whether no prefixes are registered
    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::builder::{attribute_value, scope};

    fn teams_resolver() -> impl AttributeResolver {
        attribute_resolver_fn(|_ctx: RequestContext, identity: CallerIdentity, initial: String| async move {
            let id = attribute_value(&initial).len() as i64 + identity.org_id;
            Ok::<_, AccessControlError>(scope(["teams", "id", &id.to_string()]))
        })
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = AttributeRegistry::new();
        registry.register("teams:name:", teams_resolver()).unwrap();

        let resolver = registry.get("teams:name:").unwrap();
        let resolved = resolver
            .resolve(&RequestContext::new(), &CallerIdentity::new(1, 10), "teams:name:ops")
            .await
            .unwrap();
        assert_eq!(resolved, "teams:id:13");
    }

    #[test]
    fn test_prefix_lookup_is_exact() {
        let registry = AttributeRegistry::new();
        registry.register("teams:name:", teams_resolver()).unwrap();

        assert!(registry.get("teams:").is_none());
        assert!(registry.get("teams:name:ops").is_none());
        assert_eq!(registry.prefixes(), vec!["teams:name:"]);
    }

    #[test]
    fn test_overwrite() {
        let registry = AttributeRegistry::new();
        assert!(registry.is_empty());

        registry.register("teams:name:", teams_resolver()).unwrap();
        registry.register("teams:name:", teams_resolver()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rejects_prefix_without_separator() {
        let registry = AttributeRegistry::new();

        for prefix in ["", "teams", "teams:name"] {
            let err = registry.register(prefix, teams_resolver()).unwrap_err();
            assert!(matches!(err, AccessControlError::Configuration(_)));
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_closure_resolver_sees_request_context() {
        let resolver = attribute_resolver_fn(
            |ctx: RequestContext, _identity: CallerIdentity, _initial: String| async move {
                Ok::<_, AccessControlError>(ctx.request_id.to_string())
            },
        );

        let ctx = RequestContext::new();
        let resolved = resolver
            .resolve(&ctx, &CallerIdentity::new(1, 1), "teams:name:ops")
            .await
            .unwrap();
        assert_eq!(resolved, ctx.request_id.to_string());
    }
}
