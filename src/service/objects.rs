//! Typed object access: converts between resource structs and stored payloads.

use crate::error::AppError;
use crate::resource::{ObjectKey, Resource};
use crate::store::{Filter, ObjectStore, Sort, StoredObject};
use serde_json::Value;
use std::marker::PhantomData;

pub struct Objects<'a, R> {
    store: &'a dyn ObjectStore,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, R: Resource> Objects<'a, R> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Objects {
            store,
            _resource: PhantomData,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<R>, AppError> {
        let rows = self.store.find_all(R::KIND).await?;
        rows.into_iter().map(decode).collect()
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        self.store.count(R::KIND, filter).await
    }

    pub async fn get_page(&self, filter: &Filter, sort: &Sort, offset: u64, limit: u64) -> Result<Vec<R>, AppError> {
        let rows = self.store.find_page(R::KIND, filter, sort, offset, limit).await?;
        rows.into_iter().map(decode).collect()
    }

    /// `id` is `"owner/name"`.
    pub async fn get(&self, id: &str) -> Result<Option<R>, AppError> {
        let key = ObjectKey::parse(id)?;
        self.store.find_one(R::KIND, &key).await?.map(decode).transpose()
    }

    /// Stamps `createdTime` with the current time when the body left it empty.
    pub async fn add(&self, mut object: R) -> Result<bool, AppError> {
        if object.created_time().is_empty() {
            object.set_created_time(chrono::Local::now().to_rfc3339());
        }
        self.store.insert(R::KIND, &encode(&object)?).await
    }

    pub async fn update(&self, id: &str, object: &R) -> Result<bool, AppError> {
        let key = ObjectKey::parse(id)?;
        self.store.update(R::KIND, &key, &encode(object)?).await
    }

    pub async fn delete(&self, object: &R) -> Result<bool, AppError> {
        self.store.delete(R::KIND, &object.key()).await
    }
}

fn encode<R: Resource>(object: &R) -> Result<StoredObject, AppError> {
    let payload = serde_json::to_value(object).map_err(|e| AppError::Persistence(e.to_string()))?;
    Ok(StoredObject {
        key: object.key(),
        created_time: object.created_time().to_string(),
        payload,
    })
}

/// A stored payload that no longer fits the struct is a storage fault, not bad input.
fn decode<R: Resource>(payload: Value) -> Result<R, AppError> {
    serde_json::from_value(payload).map_err(|e| AppError::Persistence(format!("corrupt {} row: {}", R::KIND.table, e)))
}
