/// Scope resolver orchestrating keyword and attribute resolution
///
/// Keyword resolution replaces exact scopes (`users:self`) from the caller's
/// identity. Attribute resolution routes a scope to the resolver registered
/// under its prefix (`datasources:name:`), memoizing results in the
/// resolution cache. Scopes matching neither pass through unchanged.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::attribute::{AttributeRegistry, AttributeResolver};
use super::builder::scope_prefix;
use super::cache::{cache_key, spawn_janitor, ResolutionCache, TtlCache};
use super::keyword::{KeywordRegistry, KeywordResolver};
use super::modifier::{AttributeScopeModifier, KeywordScopeModifier, ScopeModifierChain};
use crate::config::ResolverConfig;
use crate::context::RequestContext;
use crate::error::{AccessControlError, Result};
use crate::types::{CallerIdentity, Permission};

/// Resolves templated scopes into id-based scopes
///
/// Constructed once per process and shared across concurrent requests;
/// resolvers are registered during startup.
///
/// # Examples
///
/// ```
/// use accesscontrol::{CallerIdentity, Permission, ScopeResolver};
///
/// let resolver = ScopeResolver::new();
/// let identity = CallerIdentity::new(42, 1);
///
/// let permission = Permission::new("users:read", "users:self");
/// let resolved = resolver.resolve_keyword(&identity, &permission).unwrap();
/// assert_eq!(resolved.scope, "users:id:42");
/// assert_eq!(resolved.action, "users:read");
/// ```
pub struct ScopeResolver {
    /// Exact-match keyword resolvers
    keywords: KeywordRegistry,
    /// Prefix-match attribute resolvers
    attributes: AttributeRegistry,
    /// Memoized attribute resolutions
    cache: Arc<dyn ResolutionCache>,
    /// Cache TTL and lookup bounds
    config: ResolverConfig,
}

impl ScopeResolver {
    /// Creates a resolver with built-in keywords, no attribute resolvers and
    /// a fresh in-memory cache
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with a fresh in-memory cache and custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self::with_cache(Arc::new(TtlCache::new()), config)
    }

    /// Creates a resolver around an injected cache
    pub fn with_cache(cache: Arc<dyn ResolutionCache>, config: ResolverConfig) -> Self {
        info!(
            "ScopeResolver initialized with cache_ttl={:?}, lookup_timeout={:?}",
            config.cache_ttl(),
            config.lookup_timeout()
        );

        Self {
            keywords: KeywordRegistry::with_builtins(),
            attributes: AttributeRegistry::new(),
            cache,
            config,
        }
    }

    /// Registers a keyword resolver; last writer wins
    pub fn add_keyword_resolver<R>(&self, keyword: impl Into<String>, resolver: R)
    where
        R: KeywordResolver + 'static,
    {
        self.keywords.register(keyword, resolver);
    }

    /// Registers an attribute resolver under a scope prefix; last writer wins
    ///
    /// Fails with `Configuration` if the prefix does not end in `:`.
    pub fn add_attribute_resolver<R>(&self, prefix: impl Into<String>, resolver: R) -> Result<()>
    where
        R: AttributeResolver + 'static,
    {
        self.attributes.register(prefix, resolver)
    }

    /// Keyword registry
    pub fn keywords(&self) -> &KeywordRegistry {
        &self.keywords
    }

    /// Attribute registry
    pub fn attributes(&self) -> &AttributeRegistry {
        &self.attributes
    }

    /// Resolution cache
    pub fn cache(&self) -> &Arc<dyn ResolutionCache> {
        &self.cache
    }

    /// Resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Starts sweeping expired entries from the resolution cache every
    /// `cleanup_interval`
    ///
    /// Must be called from within a tokio runtime. Abort the handle on shutdown.
    pub fn spawn_janitor(&self) -> JoinHandle<()> {
        spawn_janitor(Arc::clone(&self.cache), self.config.cleanup_interval())
    }

    /// Resolves a keyword scope such as `orgs:current`
    ///
    /// Scopes that are not registered keywords are returned unchanged.
    pub fn resolve_keyword_scope(&self, identity: &CallerIdentity, scope: &str) -> Result<String> {
        let Some(resolver) = self.keywords.get(scope) else {
            return Ok(scope.to_string());
        };

        resolver.resolve(identity).map_err(|e| {
            warn!("Keyword resolver for {:?} failed: {}", scope, e);
            AccessControlError::resolution(scope, e)
        })
    }

    /// Resolves the scope of a permission if it is a registered keyword
    ///
    /// Returns a copy of the permission; the action is untouched.
    pub fn resolve_keyword(&self, identity: &CallerIdentity, permission: &Permission) -> Result<Permission> {
        let scope = self.resolve_keyword_scope(identity, &permission.scope)?;
        Ok(permission.with_scope(scope))
    }

    /// Resolves an attribute scope such as `datasources:name:influx`
    ///
    /// Looks up the resolver registered under the scope's prefix. Cached
    /// results are returned without calling it; successful results are cached
    /// for the configured TTL, failures never are. Scopes without a matching
    /// resolver are returned unchanged.
    pub async fn resolve_attribute_scope(
        &self,
        ctx: &RequestContext,
        identity: &CallerIdentity,
        scope: &str,
    ) -> Result<String> {
        let prefix = scope_prefix(scope);
        let Some(resolver) = self.attributes.get(&prefix) else {
            return Ok(scope.to_string());
        };

        let key = cache_key(identity, scope);
        if let Some(cached) = self.cache.get(&key) {
            debug!(request_id = %ctx.request_id, "Cache hit for {:?}", scope);
            return Ok(cached);
        }
        debug!(request_id = %ctx.request_id, "Cache miss for {:?}, invoking resolver for {:?}", scope, prefix);

        let lookup = async {
            resolver
                .resolve(ctx, identity, scope)
                .await
                .map_err(|e| AccessControlError::resolution(scope, e))
        };

        match ctx.run(lookup, self.config.lookup_timeout()).await {
            Ok(resolved) => {
                self.cache.set(&key, resolved.clone(), self.config.cache_ttl());
                Ok(resolved)
            }
            Err(e) => {
                warn!(request_id = %ctx.request_id, "Attribute resolution failed: {}", e);
                Err(e)
            }
        }
    }

    /// Modifier resolving keyword scopes for `identity`
    pub fn keyword_scope_modifier<'a>(&'a self, identity: &'a CallerIdentity) -> KeywordScopeModifier<'a> {
        KeywordScopeModifier::new(self, identity)
    }

    /// Modifier resolving attribute scopes for `identity` within `ctx`
    pub fn attribute_scope_modifier<'a>(
        &'a self,
        ctx: &'a RequestContext,
        identity: &'a CallerIdentity,
    ) -> AttributeScopeModifier<'a> {
        AttributeScopeModifier::new(self, ctx, identity)
    }

    /// Keyword modifier followed by attribute modifier
    pub fn scope_modifiers<'a>(
        &'a self,
        ctx: &'a RequestContext,
        identity: &'a CallerIdentity,
    ) -> ScopeModifierChain<'a> {
        ScopeModifierChain::new()
            .then(self.keyword_scope_modifier(identity))
            .then(self.attribute_scope_modifier(ctx, identity))
    }

    /// Resolves the scope of every permission, keyword then attribute
    ///
    /// The first failure aborts the whole call.
    pub async fn resolve_permissions(
        &self,
        ctx: &RequestContext,
        identity: &CallerIdentity,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>> {
        self.scope_modifiers(ctx, identity)
            .apply_permissions(permissions)
            .await
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::new()
    }
}
