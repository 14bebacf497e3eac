//! Builds parameterized statements against object tables.
//!
//! Table layout: `owner TEXT, name TEXT, created_time TEXT, payload JSONB`,
//! keyed by `(owner, name)`. Payload field names never reach the SQL text;
//! they are bound as parameters of `payload ->> $n`.

use crate::resource::{ObjectKey, ResourceKind};
use crate::sql::SqlParam;
use crate::store::{Filter, Sort, StoredObject};

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn qualified_table(schema: &str, kind: &ResourceKind) -> String {
    format!("{}.{}", quoted(schema), quoted(kind.table))
}

#[derive(Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<SqlParam>) -> usize {
        self.params.push(v.into());
        self.params.len()
    }
}

/// Escapes LIKE wildcards so `value` matches literally as a substring.
fn like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn where_clause(q: &mut QueryBuf, filter: &Filter) -> String {
    let mut parts = Vec::new();
    if !filter.owner.is_empty() {
        let n = q.push_param(filter.owner.as_str());
        parts.push(format!("owner = ${}", n));
    }
    if let Some((field, value)) = filter.field_match() {
        let f = q.push_param(field);
        let v = q.push_param(like_pattern(value).as_str());
        parts.push(format!("payload ->> ${} LIKE ${}", f, v));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// JSON numbers sort by value ahead of other values; the rest sort by text.
fn order_clause(q: &mut QueryBuf, sort: &Sort) -> String {
    let dir = if sort.ascending() { "ASC" } else { "DESC" };
    match sort.field() {
        None | Some("createdTime") => format!(" ORDER BY created_time {}, owner, name", dir),
        Some(field) => {
            let n = q.push_param(field);
            format!(
                " ORDER BY CASE WHEN jsonb_typeof(payload -> ${n}) = 'number' THEN (payload ->> ${n})::numeric END {dir}, \
                 payload ->> ${n} {dir}, owner, name",
                n = n,
                dir = dir
            )
        }
    }
}

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))
}

pub fn create_table(schema: &str, kind: &ResourceKind) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            owner TEXT NOT NULL,
            name TEXT NOT NULL,
            created_time TEXT NOT NULL DEFAULT '',
            payload JSONB NOT NULL,
            PRIMARY KEY (owner, name)
        )
        "#,
        qualified_table(schema, kind)
    )
}

/// SELECT every row, newest first.
pub fn select_all(schema: &str, kind: &ResourceKind) -> QueryBuf {
    let mut q = QueryBuf::new();
    let order_sql = order_clause(&mut q, &Sort::default());
    q.sql = format!("SELECT payload FROM {}{}", qualified_table(schema, kind), order_sql);
    q
}

pub fn count(schema: &str, kind: &ResourceKind, filter: &Filter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, filter);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", qualified_table(schema, kind), where_sql);
    q
}

pub fn select_page(
    schema: &str,
    kind: &ResourceKind,
    filter: &Filter,
    sort: &Sort,
    offset: u64,
    limit: u64,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, filter);
    let order_sql = order_clause(&mut q, sort);
    let l = q.push_param(limit);
    let o = q.push_param(offset);
    q.sql = format!(
        "SELECT payload FROM {}{}{} LIMIT ${} OFFSET ${}",
        qualified_table(schema, kind),
        where_sql,
        order_sql,
        l,
        o
    );
    q
}

pub fn select_one(schema: &str, kind: &ResourceKind, key: &ObjectKey) -> QueryBuf {
    let mut q = QueryBuf::new();
    let o = q.push_param(key.owner.as_str());
    let n = q.push_param(key.name.as_str());
    q.sql = format!(
        "SELECT payload FROM {} WHERE owner = ${} AND name = ${}",
        qualified_table(schema, kind),
        o,
        n
    );
    q
}

pub fn insert(schema: &str, kind: &ResourceKind, object: &StoredObject) -> QueryBuf {
    let mut q = QueryBuf::new();
    let o = q.push_param(object.key.owner.as_str());
    let n = q.push_param(object.key.name.as_str());
    let t = q.push_param(object.created_time.as_str());
    let p = q.push_param(SqlParam::Json(object.payload.clone()));
    q.sql = format!(
        "INSERT INTO {} (owner, name, created_time, payload) VALUES (${}, ${}, ${}, ${})",
        qualified_table(schema, kind),
        o,
        n,
        t,
        p
    );
    q
}

/// UPDATE every column of the row at `key`, including its key.
pub fn update(schema: &str, kind: &ResourceKind, key: &ObjectKey, object: &StoredObject) -> QueryBuf {
    let mut q = QueryBuf::new();
    let o = q.push_param(object.key.owner.as_str());
    let n = q.push_param(object.key.name.as_str());
    let t = q.push_param(object.created_time.as_str());
    let p = q.push_param(SqlParam::Json(object.payload.clone()));
    let wo = q.push_param(key.owner.as_str());
    let wn = q.push_param(key.name.as_str());
    q.sql = format!(
        "UPDATE {} SET owner = ${}, name = ${}, created_time = ${}, payload = ${} WHERE owner = ${} AND name = ${}",
        qualified_table(schema, kind),
        o,
        n,
        t,
        p,
        wo,
        wn
    );
    q
}

pub fn delete(schema: &str, kind: &ResourceKind, key: &ObjectKey) -> QueryBuf {
    let mut q = QueryBuf::new();
    let o = q.push_param(key.owner.as_str());
    let n = q.push_param(key.name.as_str());
    q.sql = format!(
        "DELETE FROM {} WHERE owner = ${} AND name = ${}",
        qualified_table(schema, kind),
        o,
        n
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{FederalLearning, Resource};

    const FL: ResourceKind = FederalLearning::KIND;

    #[test]
    fn count_without_filter_has_no_where() {
        let q = count("assetdesk", &FL, &Filter::default());
        assert_eq!(q.sql, r#"SELECT COUNT(*) FROM "assetdesk"."federal_learning""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn field_filter_binds_field_name_and_escaped_pattern() {
        let filter = Filter {
            owner: "admin".into(),
            field: "displayName".into(),
            value: "50%_off".into(),
        };
        let q = count("assetdesk", &FL, &filter);
        assert!(q.sql.ends_with("WHERE owner = $1 AND payload ->> $2 LIKE $3"));
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text("admin".into()),
                SqlParam::Text("displayName".into()),
                SqlParam::Text(r"%50\%\_off%".into()),
            ]
        );
    }

    #[test]
    fn field_without_value_is_ignored() {
        let filter = Filter {
            field: "displayName".into(),
            ..Filter::default()
        };
        assert!(!count("s", &FL, &filter).sql.contains("WHERE"));
    }

    #[test]
    fn page_orders_by_payload_field_then_limits() {
        let sort = Sort {
            field: "epochs".into(),
            order: "ascend".into(),
        };
        let q = select_page("s", &FL, &Filter::default(), &sort, 20, 10);
        assert!(q.sql.contains(
            "ORDER BY CASE WHEN jsonb_typeof(payload -> $1) = 'number' THEN (payload ->> $1)::numeric END ASC, \
             payload ->> $1 ASC, owner, name LIMIT $2 OFFSET $3"
        ));
        assert_eq!(q.params[0], SqlParam::Text("epochs".into()));
        assert_eq!(q.params[1], SqlParam::BigInt(10));
        assert_eq!(q.params[2], SqlParam::BigInt(20));
    }

    #[test]
    fn default_sort_is_newest_first() {
        let q = select_all("s", &FL);
        assert_eq!(q.sql, r#"SELECT payload FROM "s"."federal_learning" ORDER BY created_time DESC, owner, name"#);
        assert!(q.params.is_empty());
        let q = select_page("s", &FL, &Filter::default(), &Sort { field: "name".into(), order: String::new() }, 0, 5);
        assert!(q.sql.contains("ORDER BY created_time DESC"));
    }

    #[test]
    fn update_sets_new_key_and_matches_old() {
        let object = StoredObject {
            key: ObjectKey { owner: "admin".into(), name: "new".into() },
            created_time: "t".into(),
            payload: serde_json::json!({}),
        };
        let old = ObjectKey { owner: "admin".into(), name: "old".into() };
        let q = update("s", &FL, &old, &object);
        assert!(q.sql.ends_with("WHERE owner = $5 AND name = $6"));
        assert_eq!(q.params[1], SqlParam::Text("new".into()));
        assert_eq!(q.params[5], SqlParam::Text("old".into()));
    }

    #[test]
    fn identifiers_are_quoted() {
        let kind = ResourceKind { table: "we\"ird", singular: "w", plural: "ws" };
        assert_eq!(qualified_table("s", &kind), r#""s"."we""ird""#);
    }
}
