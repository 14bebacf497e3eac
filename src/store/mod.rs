//! Object persistence. One table per resource kind; each row keeps the full
//! record as a JSON payload next to its `(owner, name)` key.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_object_tables, PgStore};

use crate::config::{Settings, StoreBackend};
use crate::error::AppError;
use crate::resource::{ObjectKey, ResourceKind};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Row-level filter shared by count and page queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    /// Empty matches every owner.
    pub owner: String,
    pub field: String,
    pub value: String,
}

impl Filter {
    /// Substring match on a payload field, active only when both parts are set.
    pub fn field_match(&self) -> Option<(&str, &str)> {
        if self.field.is_empty() || self.value.is_empty() {
            None
        } else {
            Some((self.field.as_str(), self.value.as_str()))
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: String,
}

impl Sort {
    /// Payload field to sort by; `None` means `createdTime` descending.
    pub fn field(&self) -> Option<&str> {
        if self.field.is_empty() || self.order.is_empty() {
            None
        } else {
            Some(self.field.as_str())
        }
    }

    pub fn ascending(&self) -> bool {
        self.field().is_some() && self.order == "ascend"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredObject {
    pub key: ObjectKey,
    pub created_time: String,
    pub payload: Value,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every record of every owner, newest first.
    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<Value>, AppError>;

    async fn count(&self, kind: ResourceKind, filter: &Filter) -> Result<u64, AppError>;

    async fn find_page(
        &self,
        kind: ResourceKind,
        filter: &Filter,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Value>, AppError>;

    async fn find_one(&self, kind: ResourceKind, key: &ObjectKey) -> Result<Option<Value>, AppError>;

    /// Fails when the key already exists.
    async fn insert(&self, kind: ResourceKind, object: &StoredObject) -> Result<bool, AppError>;

    /// Replaces the row at `key`; `object.key` may differ to rename it.
    async fn update(&self, kind: ResourceKind, key: &ObjectKey, object: &StoredObject) -> Result<bool, AppError>;

    async fn delete(&self, kind: ResourceKind, key: &ObjectKey) -> Result<bool, AppError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Builds the configured backend. For PostgreSQL this creates the database,
/// schema and object tables when missing.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn ObjectStore>, AppError> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory object store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_object_tables(&pool, &settings.schema).await?;
            tracing::info!(schema = %settings.schema, "connected to postgres object store");
            Ok(Arc::new(PgStore::new(pool, settings.schema.clone())))
        }
    }
}
