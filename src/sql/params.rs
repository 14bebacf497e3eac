//! Typed statement parameters and binding onto sqlx queries.

use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Text(String),
    BigInt(i64),
    Json(Value),
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<u64> for SqlParam {
    fn from(n: u64) -> Self {
        SqlParam::BigInt(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            SqlParam::Text(s) => query.bind(s.as_str()),
            SqlParam::BigInt(n) => query.bind(*n),
            SqlParam::Json(v) => query.bind(v),
        };
    }
    query
}
