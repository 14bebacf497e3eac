//! PostgreSQL object store and DDL.

use crate::error::{AppError, ConfigError};
use crate::resource::{ObjectKey, ResourceKind, KINDS};
use crate::sql::{self, bind_params, QueryBuf};
use crate::store::{Filter, ObjectStore, Sort, StoredObject};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: String) -> Self {
        PgStore { pool, schema }
    }

    async fn fetch_payloads(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| r.try_get::<Value, _>("payload").map_err(AppError::from))
            .collect()
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let done = bind_params(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl ObjectStore for PgStore {
    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<Value>, AppError> {
        self.fetch_payloads(&sql::select_all(&self.schema, &kind)).await
    }

    async fn count(&self, kind: ResourceKind, filter: &Filter) -> Result<u64, AppError> {
        let q = sql::count(&self.schema, &kind, filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get(0)?;
        Ok(n.max(0) as u64)
    }

    async fn find_page(
        &self,
        kind: ResourceKind,
        filter: &Filter,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Value>, AppError> {
        self.fetch_payloads(&sql::select_page(&self.schema, &kind, filter, sort, offset, limit))
            .await
    }

    async fn find_one(&self, kind: ResourceKind, key: &ObjectKey) -> Result<Option<Value>, AppError> {
        let mut rows = self.fetch_payloads(&sql::select_one(&self.schema, &kind, key)).await?;
        Ok(rows.pop())
    }

    async fn insert(&self, kind: ResourceKind, object: &StoredObject) -> Result<bool, AppError> {
        let n = self.execute(&sql::insert(&self.schema, &kind, object)).await?;
        Ok(n > 0)
    }

    async fn update(&self, kind: ResourceKind, key: &ObjectKey, object: &StoredObject) -> Result<bool, AppError> {
        let n = self.execute(&sql::update(&self.schema, &kind, key, object)).await?;
        Ok(n > 0)
    }

    async fn delete(&self, kind: ResourceKind, key: &ObjectKey) -> Result<bool, AppError> {
        let n = self.execute(&sql::delete(&self.schema, &kind, key)).await?;
        Ok(n > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create `schema` if not exists, then one object table per resource kind.
pub async fn ensure_object_tables(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&sql::create_schema(schema)).execute(pool).await?;
    for kind in KINDS {
        sqlx::query(&sql::create_table(schema, kind)).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let db_name = match db_name {
        Some(name) if !name.is_empty() && name != "postgres" => name,
        _ => return Ok(()),
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "\"\"")))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the same server on the `postgres` database, and the target database name.
fn admin_options(url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(url).map_err(|e| ConfigError::InvalidValue {
        key: "DATABASE_URL",
        value: e.to_string(),
    })?;
    let db_name = opts.get_database().map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}
