use assetdesk::{app, route_table, AppState, MemoryStore};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new(Arc::new(MemoryStore::new())), 1024 * 1024)
}

async fn call(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> Value {
    let (status, body) = call(app, Method::GET, uri, "").await;
    assert_eq!(status, StatusCode::OK, "GET {} -> {}", uri, body);
    body
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    let (status, body) = call(app, Method::POST, uri, &body.to_string()).await;
    assert_eq!(status, StatusCode::OK, "POST {} -> {}", uri, body);
    body
}

fn fl(owner: &str, name: &str, second: u32) -> Value {
    json!({
        "owner": owner,
        "name": name,
        "createdTime": format!("2024-01-01T00:00:{:02}Z", second),
        "displayName": format!("Job {}", name),
        "hospitals": ["h1", "h2"],
        "epochs": second,
    })
}

async fn seed_fls(app: &Router, n: u32) {
    for i in 1..=n {
        let body = post(app, "/api/add-fl", fl("admin", &format!("fl{:02}", i), i)).await;
        assert_eq!(body["data"], "Affected");
    }
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_then_get_then_delete() {
    let app = test_app();
    let body = post(&app, "/api/add-fl", fl("admin", "fl1", 5)).await;
    assert_eq!(body, json!({ "status": "ok", "msg": "", "data": "Affected" }));

    let body = get(&app, "/api/get-fl?id=admin/fl1").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"]["displayName"], "Job fl1");
    assert_eq!(body["data"]["hospitals"], json!(["h1", "h2"]));

    let body = post(&app, "/api/delete-fl", json!({ "owner": "admin", "name": "fl1" })).await;
    assert_eq!(body["data"], "Affected");
    let body = get(&app, "/api/get-fl?id=admin/fl1").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"], Value::Null);

    let body = post(&app, "/api/delete-fl", json!({ "owner": "admin", "name": "fl1" })).await;
    assert_eq!(body["data"], "Unaffected");
}

#[tokio::test]
async fn add_stamps_missing_created_time() {
    let app = test_app();
    post(&app, "/api/add-hospital", json!({ "owner": "admin", "name": "central" })).await;
    let body = get(&app, "/api/get-hospital?id=admin/central").await;
    assert!(!body["data"]["createdTime"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn update_by_id_can_rename() {
    let app = test_app();
    post(&app, "/api/add-patient", json!({ "owner": "admin", "name": "p1", "bloodType": "A" })).await;

    let body = post(
        &app,
        "/api/update-patient?id=admin/p1",
        json!({ "owner": "admin", "name": "p2", "bloodType": "B" }),
    )
    .await;
    assert_eq!(body["data"], "Affected");
    assert_eq!(get(&app, "/api/get-patient?id=admin/p1").await["data"], Value::Null);
    assert_eq!(get(&app, "/api/get-patient?id=admin/p2").await["data"]["bloodType"], "B");

    let body = post(&app, "/api/update-patient?id=admin/missing", json!({ "owner": "admin", "name": "x" })).await;
    assert_eq!(body["data"], "Unaffected");
}

#[tokio::test]
async fn malformed_bodies_yield_error_envelope() {
    let app = test_app();
    for uri in ["/api/add-fl", "/api/update-fl?id=admin/fl1", "/api/delete-fl"] {
        for body in ["{not json", "", r#"{"epochs":"many"}"#, "42"] {
            let (status, value) = call(&app, Method::POST, uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} with {:?}", uri, body);
            assert_eq!(value["status"], "error");
            assert!(!value["msg"].as_str().unwrap().is_empty());
        }
    }
}

#[tokio::test]
async fn duplicate_add_is_a_persistence_error() {
    let app = test_app();
    post(&app, "/api/add-doctor", json!({ "owner": "admin", "name": "d1" })).await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/add-doctor",
        &json!({ "owner": "admin", "name": "d1" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["msg"].as_str().unwrap().contains("admin/d1"));
}

#[tokio::test]
async fn get_with_malformed_id_is_rejected() {
    let app = test_app();
    let (status, body) = call(&app, Method::GET, "/api/get-fl?id=fl1", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn rejected_query_strings_yield_error_envelope() {
    let app = test_app();
    for uri in [
        "/api/get-fls?pageSize=2&p=1&p=2",
        "/api/get-fl?id=a/b&id=a/c",
        "/api/update-fl?id=a/b&id=a/c",
    ] {
        let method = if uri.contains("update-") { Method::POST } else { Method::GET };
        let (status, body) = call(&app, method, uri, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["status"], "error");
        assert!(body["msg"].as_str().unwrap().contains("duplicate field"), "{} -> {}", uri, body);
    }
}

#[tokio::test]
async fn list_without_pagination_returns_everything() {
    let app = test_app();
    seed_fls(&app, 4).await;
    post(&app, "/api/add-fl", fl("other", "x", 9)).await;

    let body = get(&app, "/api/get-fls").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert!(body.get("data2").is_none());

    // owner and field/value only apply to paginated lists
    let body = get(&app, "/api/get-fls?owner=admin").await;
    assert_eq!(names(&body), ["x", "fl04", "fl03", "fl02", "fl01"]);
    let body = get(&app, "/api/get-fls?owner=admin&field=name&value=fl01").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    // only one of the two pagination parameters
    let body = get(&app, "/api/get-fls?pageSize=2").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn paginated_list_reports_total_pages() {
    let app = test_app();
    seed_fls(&app, 23).await;

    let body = get(&app, "/api/get-fls?owner=admin&pageSize=10&p=1").await;
    assert_eq!(body["data2"], 3);
    assert_eq!(names(&body).first().map(String::as_str), Some("fl23"));
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let body = get(&app, "/api/get-fls?owner=admin&pageSize=10&p=3").await;
    assert_eq!(names(&body), ["fl03", "fl02", "fl01"]);

    // past the last page clamps to the last page
    let body = get(&app, "/api/get-fls?owner=admin&pageSize=10&p=99").await;
    assert_eq!(names(&body), ["fl03", "fl02", "fl01"]);
}

#[tokio::test]
async fn page_never_exceeds_page_size() {
    let app = test_app();
    seed_fls(&app, 11).await;
    for size in 1..=6u32 {
        let pages = 11u32.div_ceil(size);
        let mut seen = 0;
        for page in 1..=pages {
            let uri = format!("/api/get-fls?pageSize={}&p={}", size, page);
            let body = get(&app, &uri).await;
            let len = body["data"].as_array().unwrap().len() as u32;
            assert!(len <= size);
            assert_eq!(body["data2"], pages);
            seen += len;
        }
        assert_eq!(seen, 11);
    }
}

#[tokio::test]
async fn paginated_list_filters_and_sorts() {
    let app = test_app();
    seed_fls(&app, 12).await;
    post(&app, "/api/add-fl", fl("other", "fl01", 1)).await;

    let body = get(&app, "/api/get-fls?owner=admin&pageSize=5&p=1&field=name&value=fl1&sortField=name&sortOrder=ascend").await;
    assert_eq!(names(&body), ["fl10", "fl11", "fl12"]);
    assert_eq!(body["data2"], 1);

    let body = get(&app, "/api/get-fls?pageSize=5&p=1&field=name&value=fl01").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // numbers sort by value, not text
    let body = get(&app, "/api/get-fls?owner=admin&pageSize=3&p=1&sortField=epochs&sortOrder=ascend").await;
    assert_eq!(names(&body), ["fl01", "fl02", "fl03"]);
    let body = get(&app, "/api/get-fls?owner=admin&pageSize=3&p=1&sortField=epochs&sortOrder=descend").await;
    assert_eq!(names(&body), ["fl12", "fl11", "fl10"]);

    let body = get(&app, "/api/get-fls?owner=nobody&pageSize=5&p=1").await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["data2"], 0);
}

#[tokio::test]
async fn every_table_entry_is_routed() {
    let app = test_app();
    for entry in route_table() {
        let uri = match entry.path.as_str() {
            p if p.contains("/get-") || p.contains("/update-") => format!("{}?id=admin/none", p),
            p => p.to_string(),
        };
        let (status, body) = call(&app, entry.method.clone(), &uri, "{}").await;
        assert_eq!(status, StatusCode::OK, "{} {} -> {}", entry.method, uri, body);
        assert_eq!(body["status"], "ok");
    }
}

#[tokio::test]
async fn wrong_verb_and_unknown_paths_are_not_routed() {
    let app = test_app();
    let (status, _) = call(&app, Method::GET, "/api/add-fl", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = call(&app, Method::GET, "/api/get-federal-learnings", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::POST, "/api/start-session", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_ready() {
    let app = test_app();
    assert_eq!(get(&app, "/health").await["status"], "ok");
    let ready = get(&app, "/ready").await;
    assert_eq!(ready, json!({ "status": "ok", "store": "ok" }));
    assert_eq!(get(&app, "/version").await["name"], "assetdesk");
}
