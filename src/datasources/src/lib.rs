//! # Datasource Scope Resolvers
//!
//! Attribute resolvers turning `datasources:name:<name>` and
//! `datasources:uid:<uid>` scopes into `datasources:id:<id>`, backed by a
//! datasource store scoped to the caller's organization.
//!
//! ## Example
//!
//! ```rust
//! use accesscontrol::{CallerIdentity, RequestContext, ScopeResolver};
//! use accesscontrol_datasources::{register_data_source_resolvers, DataSource, InMemoryDataSourceStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryDataSourceStore::new());
//!     store.insert(DataSource::new(7, "P8E80F9AEF21F6940", 1, "influx", "influxdb")).await;
//!
//!     let resolver = ScopeResolver::new();
//!     register_data_source_resolvers(&resolver, store)?;
//!
//!     let scope = resolver
//!         .resolve_attribute_scope(&RequestContext::new(), &CallerIdentity::new(42, 1), "datasources:name:influx")
//!         .await?;
//!     assert_eq!(scope, "datasources:id:7");
//!
//!     Ok(())
//! }
//! ```

pub mod resolver;
pub mod store;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use resolver::{
    data_source_id_scope, register_data_source_resolvers, DataSourceNameResolver,
    DataSourceUidResolver, DATASOURCES_NAME_PREFIX, DATASOURCES_UID_PREFIX,
};
pub use store::{DataSource, DataSourceId, DataSourceLookup, InMemoryDataSourceStore};

#[cfg(feature = "postgres")]
pub use postgres::PostgresDataSourceStore;
