/// Scope resolution module
///
/// Turns keyword and attribute scopes into id-based scopes, with a TTL cache
/// in front of attribute lookups.
///
/// # Examples
///
/// ```
/// use accesscontrol::scope::{scope, scope_prefix, ScopeResolver};
/// use accesscontrol::CallerIdentity;
///
/// let resolver = ScopeResolver::new();
/// let identity = CallerIdentity::new(42, 1);
///
/// assert_eq!(scope_prefix(&scope(["a", "b", "c"])), "a:b:");
/// assert_eq!(resolver.resolve_keyword_scope(&identity, "orgs:current").unwrap(), "orgs:id:1");
/// assert_eq!(resolver.resolve_keyword_scope(&identity, "users:id:7").unwrap(), "users:id:7");
/// ```

mod attribute;
mod builder;
mod cache;
mod keyword;
mod modifier;
mod resolver;


pub use attribute::{attribute_resolver_fn, AttributeRegistry, AttributeResolver, FnAttributeResolver};
pub use builder::{attribute_value, field, parameter, scope, scope_prefix, SEPARATOR};
pub use cache::{cache_key, spawn_janitor, CacheStats, ResolutionCache, TtlCache};
pub use keyword::{
    resolve_current_org, resolve_user_self, KeywordRegistry, KeywordResolver, ORGS_CURRENT,
    USERS_SELF,
};
pub use modifier::{AttributeScopeModifier, KeywordScopeModifier, ScopeModifier, ScopeModifierChain};
pub use resolver::ScopeResolver;
