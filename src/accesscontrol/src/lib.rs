//! # Access Control Scope Resolution
//!
//! Turns templated permission scopes (`users:self`, `datasources:name:influx`)
//! into identifier-based scopes (`users:id:42`, `datasources:id:7`) that a
//! policy evaluator can compare directly against the resource being accessed.
//!
//! ## Features
//!
//! - **Keyword resolution** for exact scopes such as `orgs:current` and `users:self`
//! - **Attribute resolution** for scope prefixes backed by external lookups
//! - **TTL caching** of attribute results, isolated per caller
//! - **Cancellation and deadlines** propagated from the request context
//!
//! ## Example
//!
//! ```rust
//! use accesscontrol::{CallerIdentity, RequestContext, ScopeResolver};
//! use accesscontrol::scope::ScopeModifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = ScopeResolver::new();
//!     let identity = CallerIdentity::new(42, 1);
//!     let ctx = RequestContext::new();
//!
//!     let chain = resolver.scope_modifiers(&ctx, &identity);
//!     assert_eq!(chain.modify("users:self").await?, "users:id:42");
//!     assert_eq!(chain.modify("orgs:current").await?, "orgs:id:1");
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod scope;
pub mod types;

// Re-export commonly used types
pub use config::ResolverConfig;
pub use context::RequestContext;
pub use error::{AccessControlError, Result};
pub use scope::{
    AttributeResolver, CacheStats, KeywordResolver, ResolutionCache, ScopeModifier,
    ScopeResolver, TtlCache,
};
pub use types::{CallerIdentity, OrgId, Permission, UserId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
