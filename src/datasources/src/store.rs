//! Datasource storage

use accesscontrol::{AccessControlError, OrgId, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Unique datasource identifier
pub type DataSourceId = i64;

/// A configured datasource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Numeric identifier, immutable
    pub id: DataSourceId,

    /// Stable external identifier
    pub uid: String,

    /// Owning organization
    pub org_id: OrgId,

    /// Human-friendly name, unique per organization
    pub name: String,

    /// Plugin type (e.g., "influxdb", "prometheus")
    #[serde(rename = "type")]
    pub kind: String,
}

impl DataSource {
    /// Create a new datasource record
    pub fn new(
        id: DataSourceId,
        uid: impl Into<String>,
        org_id: OrgId,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id,
            uid: uid.into(),
            org_id,
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Datasource lookup used by attribute resolvers
///
/// A missing datasource is an `AccessControlError::NotFound`, never a
/// zero-valued record.
#[async_trait]
pub trait DataSourceLookup: Send + Sync {
    /// Find a datasource by name within an organization
    async fn lookup_by_name(&self, org_id: OrgId, name: &str) -> Result<DataSource>;

    /// Find a datasource by uid within an organization
    async fn lookup_by_uid(&self, org_id: OrgId, uid: &str) -> Result<DataSource>;
}

/// In-memory datasource store implementation
pub struct InMemoryDataSourceStore {
    data_sources: Arc<RwLock<HashMap<DataSourceId, DataSource>>>,
}

impl InMemoryDataSourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            data_sources: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a datasource
    pub async fn insert(&self, data_source: DataSource) {
        let mut data_sources = self.data_sources.write().await;
        data_sources.insert(data_source.id, data_source);
    }

    /// Remove a datasource by id
    pub async fn remove(&self, id: DataSourceId) -> Option<DataSource> {
        let mut data_sources = self.data_sources.write().await;
        data_sources.remove(&id)
    }

    /// Number of stored datasources
    pub async fn len(&self) -> usize {
        self.data_sources.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.data_sources.read().await.is_empty()
    }

    async fn find<P>(&self, predicate: P) -> Option<DataSource>
    where
        P: Fn(&DataSource) -> bool,
    {
        let data_sources = self.data_sources.read().await;
        data_sources.values().find(|ds| predicate(ds)).cloned()
    }
}

impl Default for InMemoryDataSourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSourceLookup for InMemoryDataSourceStore {
    async fn lookup_by_name(&self, org_id: OrgId, name: &str) -> Result<DataSource> {
        self.find(|ds| ds.org_id == org_id && ds.name == name)
            .await
            .ok_or_else(|| {
                AccessControlError::NotFound(format!("datasource name={:?} org_id={}", name, org_id))
            })
    }

    async fn lookup_by_uid(&self, org_id: OrgId, uid: &str) -> Result<DataSource> {
        self.find(|ds| ds.org_id == org_id && ds.uid == uid)
            .await
            .ok_or_else(|| {
                AccessControlError::NotFound(format!("datasource uid={:?} org_id={}", uid, org_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> InMemoryDataSourceStore {
        let store = InMemoryDataSourceStore::new();
        store.insert(DataSource::new(7, "influx-uid", 1, "influx", "influxdb")).await;
        store.insert(DataSource::new(8, "prom-uid", 1, "prometheus", "prometheus")).await;
        store.insert(DataSource::new(9, "influx-uid-2", 2, "influx", "influxdb")).await;
        store
    }

    #[tokio::test]
    async fn test_lookup_by_name_scoped_to_org() {
        let store = seeded_store().await;

        assert_eq!(store.lookup_by_name(1, "influx").await.unwrap().id, 7);
        assert_eq!(store.lookup_by_name(2, "influx").await.unwrap().id, 9);
        assert!(matches!(
            store.lookup_by_name(2, "prometheus").await,
            Err(AccessControlError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_by_uid() {
        let store = seeded_store().await;

        assert_eq!(store.lookup_by_uid(1, "prom-uid").await.unwrap().name, "prometheus");
        assert!(store.lookup_by_uid(2, "prom-uid").await.is_err());
    }

    #[tokio::test]
    async fn test_insert_replace_remove() {
        let store = seeded_store().await;
        assert_eq!(store.len().await, 3);

        store.insert(DataSource::new(7, "influx-uid", 1, "influx-renamed", "influxdb")).await;
        assert_eq!(store.len().await, 3);
        assert!(store.lookup_by_name(1, "influx").await.is_err());

        let removed = store.remove(7).await.unwrap();
        assert_eq!(removed.name, "influx-renamed");
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn test_serde_type_field() {
        let ds = DataSource::new(1, "abc", 1, "loki", "loki");
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(json["type"], "loki");

        let back: DataSource = serde_json::from_value(json).unwrap();
        assert_eq!(back, ds);
    }
}
