//! In-process object store with the same query semantics as [`PgStore`](super::PgStore).

use crate::error::AppError;
use crate::resource::{ObjectKey, ResourceKind};
use crate::store::{Filter, ObjectStore, Sort, StoredObject};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

type Table = BTreeMap<ObjectKey, StoredObject>;

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, kind: ResourceKind, f: impl FnOnce(Option<&Table>) -> T) -> T {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        f(tables.get(kind.table))
    }

    fn write<T>(&self, kind: ResourceKind, f: impl FnOnce(&mut Table) -> T) -> T {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        f(tables.entry(kind.table).or_default())
    }

    /// Rows passing `filter`, in key order.
    fn select(&self, kind: ResourceKind, filter: &Filter) -> Vec<StoredObject> {
        self.read(kind, |table| {
            table
                .into_iter()
                .flat_map(|t| t.values())
                .filter(|o| matches(o, filter))
                .cloned()
                .collect()
        })
    }
}

/// Text form of a payload field, as `payload ->> field` yields it.
fn field_text(payload: &Value, field: &str) -> Option<String> {
    match payload.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(object: &StoredObject, filter: &Filter) -> bool {
    if !filter.owner.is_empty() && object.key.owner != filter.owner {
        return false;
    }
    match filter.field_match() {
        None => true,
        Some((field, value)) => field_text(&object.payload, field)
            .map(|text| text.contains(value))
            .unwrap_or(false),
    }
}

/// NULLs sort last ascending and first descending, as in PostgreSQL.
fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// Stable sort over key-ordered rows, so ties fall back to `(owner, name)`.
/// A payload field sorts JSON numbers by value first, then by text form.
fn sort_objects(objects: &mut [StoredObject], sort: &Sort) {
    let ascending = sort.ascending();
    let field = sort.field().filter(|f| *f != "createdTime");
    objects.sort_by(|a, b| {
        let ord = match field {
            None => a.created_time.cmp(&b.created_time),
            Some(field) => {
                let number = |o: &StoredObject| o.payload.get(field).filter(|v| v.is_number()).and_then(Value::as_f64);
                nulls_last(number(a), number(b), |x, y| x.total_cmp(y)).then_with(|| {
                    nulls_last(field_text(&a.payload, field), field_text(&b.payload, field), |x, y| x.cmp(y))
                })
            }
        };
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<Value>, AppError> {
        let mut rows = self.select(kind, &Filter::default());
        sort_objects(&mut rows, &Sort::default());
        Ok(rows.into_iter().map(|o| o.payload).collect())
    }

    async fn count(&self, kind: ResourceKind, filter: &Filter) -> Result<u64, AppError> {
        Ok(self.select(kind, filter).len() as u64)
    }

    async fn find_page(
        &self,
        kind: ResourceKind,
        filter: &Filter,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Value>, AppError> {
        let mut rows = self.select(kind, filter);
        sort_objects(&mut rows, sort);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).map(|o| o.payload).collect())
    }

    async fn find_one(&self, kind: ResourceKind, key: &ObjectKey) -> Result<Option<Value>, AppError> {
        Ok(self.read(kind, |table| {
            table.and_then(|t| t.get(key)).map(|o| o.payload.clone())
        }))
    }

    async fn insert(&self, kind: ResourceKind, object: &StoredObject) -> Result<bool, AppError> {
        self.write(kind, |table| {
            if table.contains_key(&object.key) {
                return Err(duplicate(kind, &object.key));
            }
            table.insert(object.key.clone(), object.clone());
            Ok(true)
        })
    }

    async fn update(&self, kind: ResourceKind, key: &ObjectKey, object: &StoredObject) -> Result<bool, AppError> {
        self.write(kind, |table| {
            if !table.contains_key(key) {
                return Ok(false);
            }
            if object.key != *key && table.contains_key(&object.key) {
                return Err(duplicate(kind, &object.key));
            }
            table.remove(key);
            table.insert(object.key.clone(), object.clone());
            Ok(true)
        })
    }

    async fn delete(&self, kind: ResourceKind, key: &ObjectKey) -> Result<bool, AppError> {
        Ok(self.write(kind, |table| table.remove(key).is_some()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn duplicate(kind: ResourceKind, key: &ObjectKey) -> AppError {
    AppError::Persistence(format!("duplicate key {} in {}", key, kind.table))
}
