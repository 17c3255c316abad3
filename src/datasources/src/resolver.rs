//! Datasource attribute resolvers

use accesscontrol::scope::{attribute_value, scope, AttributeResolver};
use accesscontrol::{AccessControlError, CallerIdentity, RequestContext, Result, ScopeResolver};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::store::{DataSourceId, DataSourceLookup};

/// Prefix of name-based datasource scopes
pub const DATASOURCES_NAME_PREFIX: &str = "datasources:name:";

/// Prefix of uid-based datasource scopes
pub const DATASOURCES_UID_PREFIX: &str = "datasources:uid:";

/// `datasources:id:<id>`
pub fn data_source_id_scope(id: DataSourceId) -> String {
    scope(["datasources", "id", &id.to_string()])
}

fn requested_value<'a>(initial_scope: &'a str, prefix: &str) -> Result<&'a str> {
    let value = attribute_value(initial_scope);
    if !initial_scope.starts_with(prefix) || value.is_empty() {
        return Err(AccessControlError::InvalidScope(format!(
            "expected {}<value>, got {:?}",
            prefix, initial_scope
        )));
    }
    Ok(value)
}

/// Resolves `datasources:name:<name>` in the caller's organization
pub struct DataSourceNameResolver {
    store: Arc<dyn DataSourceLookup>,
}

impl DataSourceNameResolver {
    /// Create a resolver backed by `store`
    pub fn new(store: Arc<dyn DataSourceLookup>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AttributeResolver for DataSourceNameResolver {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        identity: &CallerIdentity,
        initial_scope: &str,
    ) -> Result<String> {
        let name = requested_value(initial_scope, DATASOURCES_NAME_PREFIX)?;
        debug!(request_id = %ctx.request_id, "Looking up datasource name={:?} org_id={}", name, identity.org_id);

        let data_source = self.store.lookup_by_name(identity.org_id, name).await?;
        Ok(data_source_id_scope(data_source.id))
    }
}

/// Resolves `datasources:uid:<uid>` in the caller's organization
pub struct DataSourceUidResolver {
    store: Arc<dyn DataSourceLookup>,
}

impl DataSourceUidResolver {
    /// Create a resolver backed by `store`
    pub fn new(store: Arc<dyn DataSourceLookup>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AttributeResolver for DataSourceUidResolver {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        identity: &CallerIdentity,
        initial_scope: &str,
    ) -> Result<String> {
        let uid = requested_value(initial_scope, DATASOURCES_UID_PREFIX)?;
        debug!(request_id = %ctx.request_id, "Looking up datasource uid={:?} org_id={}", uid, identity.org_id);

        let data_source = self.store.lookup_by_uid(identity.org_id, uid).await?;
        Ok(data_source_id_scope(data_source.id))
    }
}

/// Registers the name and uid resolvers on `resolver`
pub fn register_data_source_resolvers(resolver: &ScopeResolver, store: Arc<dyn DataSourceLookup>) -> Result<()> {
    resolver.add_attribute_resolver(
        DATASOURCES_NAME_PREFIX,
        DataSourceNameResolver::new(Arc::clone(&store)),
    )?;
    resolver.add_attribute_resolver(DATASOURCES_UID_PREFIX, DataSourceUidResolver::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DataSource, InMemoryDataSourceStore};

    async fn store() -> Arc<InMemoryDataSourceStore> {
        let store = Arc::new(InMemoryDataSourceStore::new());
        store.insert(DataSource::new(7, "influx-uid", 1, "influx", "influxdb")).await;
        store
    }

    #[test]
    fn test_id_scope() {
        assert_eq!(data_source_id_scope(7), "datasources:id:7");
    }

    #[tokio::test]
    async fn test_name_resolver() {
        let resolver = DataSourceNameResolver::new(store().await);
        let ctx = RequestContext::new();

        let resolved = resolver
            .resolve(&ctx, &CallerIdentity::new(42, 1), "datasources:name:influx")
            .await
            .unwrap();
        assert_eq!(resolved, "datasources:id:7");
    }

    #[tokio::test]
    async fn test_name_resolver_wrong_org() {
        let resolver = DataSourceNameResolver::new(store().await);
        let ctx = RequestContext::new();

        let err = resolver
            .resolve(&ctx, &CallerIdentity::new(42, 2), "datasources:name:influx")
            .await
            .unwrap_err();
        assert!(matches!(err, AccessControlError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_uid_resolver() {
        let resolver = DataSourceUidResolver::new(store().await);
        let ctx = RequestContext::new();

        let resolved = resolver
            .resolve(&ctx, &CallerIdentity::new(42, 1), "datasources:uid:influx-uid")
            .await
            .unwrap();
        assert_eq!(resolved, "datasources:id:7");
    }

    #[tokio::test]
    async fn test_rejects_mismatched_shape() {
        let resolver = DataSourceNameResolver::new(store().await);
        let ctx = RequestContext::new();
        let identity = CallerIdentity::new(42, 1);

        for bad in ["datasources:name:", "datasources:uid:influx", "influx"] {
            let err = resolver.resolve(&ctx, &identity, bad).await.unwrap_err();
            assert!(matches!(err, AccessControlError::InvalidScope(_)), "{}", bad);
        }
    }

    #[test]
    fn test_register() {
        let resolver = ScopeResolver::new();
        register_data_source_resolvers(&resolver, Arc::new(InMemoryDataSourceStore::new())).unwrap();

        assert_eq!(
            resolver.attributes().prefixes(),
            vec![DATASOURCES_NAME_PREFIX, DATASOURCES_UID_PREFIX]
        );
    }
}
