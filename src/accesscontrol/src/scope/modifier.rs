/// Scope modifiers
///
/// A modifier is the unit consumers apply to each permission scope before an
/// access check. It returns the scope unchanged, resolved, or an error; never
/// a partially substituted template.

use async_trait::async_trait;
use futures::future::try_join_all;

use super::resolver::ScopeResolver;
use crate::context::RequestContext;
use crate::error::{AccessControlError, Result};
use crate::types::{CallerIdentity, Permission};

/// Transforms a scope into its resolved form
#[async_trait]
pub trait ScopeModifier: Send + Sync {
    /// Resolve `scope`, or return it unchanged if nothing applies
    async fn modify(&self, scope: &str) -> Result<String>;
}

/// Keyword resolution bound to one caller
pub struct KeywordScopeModifier<'a> {
    resolver: &'a ScopeResolver,
    identity: &'a CallerIdentity,
}

impl<'a> KeywordScopeModifier<'a> {
    pub(crate) fn new(resolver: &'a ScopeResolver, identity: &'a CallerIdentity) -> Self {
        Self { resolver, identity }
    }

    /// Synchronous form; keyword resolution never performs I/O
    pub fn apply(&self, scope: &str) -> Result<String> {
        self.resolver.resolve_keyword_scope(self.identity, scope)
    }
}

#[async_trait]
impl<'a> ScopeModifier for KeywordScopeModifier<'a> {
    async fn modify(&self, scope: &str) -> Result<String> {
        self.apply(scope)
    }
}

/// Attribute resolution bound to one caller and request
pub struct AttributeScopeModifier<'a> {
    resolver: &'a ScopeResolver,
    ctx: &'a RequestContext,
    identity: &'a CallerIdentity,
}

impl<'a> AttributeScopeModifier<'a> {
    pub(crate) fn new(
        resolver: &'a ScopeResolver,
        ctx: &'a RequestContext,
        identity: &'a CallerIdentity,
    ) -> Self {
        Self { resolver, ctx, identity }
    }
}

#[async_trait]
impl<'a> ScopeModifier for AttributeScopeModifier<'a> {
    async fn modify(&self, scope: &str) -> Result<String> {
        self.resolver
            .resolve_attribute_scope(self.ctx, self.identity, scope)
            .await
    }
}

/// Modifiers applied in order, each to the previous one's output
#[derive(Default)]
pub struct ScopeModifierChain<'a> {
    modifiers: Vec<Box<dyn ScopeModifier + 'a>>,
}

impl<'a> ScopeModifierChain<'a> {
    /// Creates an empty chain, which passes every scope through
    pub fn new() -> Self {
        Self { modifiers: Vec::new() }
    }

    /// Appends a modifier
    pub fn then<M>(mut self, modifier: M) -> Self
    where
        M: ScopeModifier + 'a,
    {
        self.modifiers.push(Box::new(modifier));
        self
    }

    /// Number of modifiers
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Whether the chain has no modifiers
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Applies the chain to every permission's scope
    ///
    /// Scopes are resolved concurrently; the first error aborts the call.
    pub async fn apply_permissions(&self, permissions: &[Permission]) -> Result<Vec<Permission>> {
        try_join_all(permissions.iter().map(|permission| async move {
            let scope = self.modify(&permission.scope).await?;
            Ok::<_, AccessControlError>(permission.with_scope(scope))
        }))
        .await
    }
}

#[async_trait]
impl<'a> ScopeModifier for ScopeModifierChain<'a> {
    async fn modify(&self, scope: &str) -> Result<String> {
        let mut current = scope.to_string();
        for modifier in &self.modifiers {
            current = modifier.modify(&current).await?;
        }
        Ok(current)
    }
}
