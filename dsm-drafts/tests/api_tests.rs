//! Integration tests for dsm-drafts API endpoints
//!
//! Tests cover:
//! - Saving drafts (required fields, default titles, verbatim storage)
//! - Listing, loading, updating and deleting drafts
//! - Per-user scoping through the X-User-Id header
//! - Health endpoint (no user required)

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::util::ServiceExt; // for `oneshot` method
use dsm_drafts::{build_router, AppState};

/// Test helper: fresh in-memory database with the draft schema
async fn setup_test_db() -> SqlitePool {
    // One connection, otherwise each connection sees its own empty database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    dsm_drafts::db::init_schema(&pool)
        .await
        .expect("Should create schema");
    pool
}

fn setup_app(db: SqlitePool) -> axum::Router {
    build_router(AppState::new(db))
}

/// Test helper: request as `user` with an optional JSON body
fn user_request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn hierarchy_draft() -> Value {
    json!({
        "method_type": "hierarchy",
        "current_route": "/hierarchy/matrix",
        "form_data": {
            "task": "Вибір ноутбука",
            "numCriteria": 2,
            "criteriaNames": ["Ціна", "Вага"],
            "matrices": {
                "criteria": [["1", "3"], ["1/3", "1"]]
            }
        },
        "is_auto_save": true
    })
}

/// Save a draft as `user` and return its id
async fn save(app: &axum::Router, user: &str, body: Value) -> i64 {
    let response = app
        .clone()
        .oneshot(user_request("POST", "/drafts/api", Some(user), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    body["draft_id"].as_i64().expect("draft_id should be a number")
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_user_required() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(user_request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "dsm-drafts");
    assert!(body["version"].is_string());
}

// =============================================================================
// Save
// =============================================================================

#[tokio::test]
async fn test_save_returns_created_with_id() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(user_request("POST", "/drafts/api", Some("u1"), Some(hierarchy_draft())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Чернетку збережено");
    assert!(body["draft_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_save_requires_user() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(user_request("POST", "/drafts/api", None, Some(hierarchy_draft())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_reports_missing_field() {
    let app = setup_app(setup_test_db().await);

    for field in ["method_type", "current_route", "form_data"] {
        let mut body = hierarchy_draft();
        body.as_object_mut().unwrap().remove(field);

        let response = app
            .clone()
            .oneshot(user_request("POST", "/drafts/api", Some("u1"), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"], format!("Missing required field: {}", field));
    }
}

#[tokio::test]
async fn test_save_generates_title_from_method() {
    let app = setup_app(setup_test_db().await);
    let id = save(&app, "u1", hierarchy_draft()).await;

    let response = app
        .oneshot(user_request("GET", &format!("/drafts/api/{}", id), Some("u1"), None))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    let title = body["title"].as_str().unwrap();
    assert!(title.starts_with("Метод Аналізу Ієрархій - "), "title: {}", title);
}

#[tokio::test]
async fn test_save_keeps_explicit_title() {
    let app = setup_app(setup_test_db().await);
    let mut draft = hierarchy_draft();
    draft["title"] = json!("Мій ноутбук");
    let id = save(&app, "u1", draft).await;

    let response = app
        .oneshot(user_request("GET", &format!("/drafts/api/{}", id), Some("u1"), None))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "Мій ноутбук");
}

#[tokio::test]
async fn test_inconsistent_matrix_is_stored_verbatim() {
    let app = setup_app(setup_test_db().await);
    let mut draft = hierarchy_draft();
    draft["form_data"]["matrices"]["criteria"] = json!([["1", "3"], ["5", "1"]]);
    let id = save(&app, "u1", draft).await;

    let response = app
        .oneshot(user_request("GET", &format!("/drafts/api/{}", id), Some("u1"), None))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["form_data"]["matrices"]["criteria"][1][0], "5");
}

// =============================================================================
// List / get
// =============================================================================

#[tokio::test]
async fn test_list_is_scoped_to_user() {
    let app = setup_app(setup_test_db().await);
    let first = save(&app, "u1", hierarchy_draft()).await;
    let second = save(&app, "u1", hierarchy_draft()).await;
    save(&app, "u2", hierarchy_draft()).await;

    let response = app
        .oneshot(user_request("GET", "/drafts/api", Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let ids: Vec<i64> = body["drafts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(body["drafts"][0]["method_type"], "hierarchy");
    assert_eq!(body["drafts"][0]["current_route"], "/hierarchy/matrix");
}

#[tokio::test]
async fn test_get_returns_form_data() {
    let app = setup_app(setup_test_db().await);
    let id = save(&app, "u1", hierarchy_draft()).await;

    let response = app
        .oneshot(user_request("GET", &format!("/drafts/api/{}", id), Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["form_data"]["task"], "Вибір ноутбука");
    assert_eq!(body["form_data"]["criteriaNames"][1], "Вага");
}

#[tokio::test]
async fn test_foreign_draft_is_not_found() {
    let app = setup_app(setup_test_db().await);
    let id = save(&app, "u1", hierarchy_draft()).await;

    let response = app
        .oneshot(user_request("GET", &format!("/drafts/api/{}", id), Some("u2"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Чернетку не знайдено");
}

// =============================================================================
// Update / delete
// =============================================================================

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let app = setup_app(setup_test_db().await);
    let id = save(&app, "u1", hierarchy_draft()).await;
    let uri = format!("/drafts/api/{}", id);

    let response = app
        .clone()
        .oneshot(user_request(
            "PUT",
            &uri,
            Some("u1"),
            Some(json!({ "form_data": { "task": "Новий" } })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Чернетку оновлено");

    let response = app
        .oneshot(user_request("GET", &uri, Some("u1"), None))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["form_data"]["task"], "Новий");
    assert_eq!(body["current_route"], "/hierarchy/matrix");
}

#[tokio::test]
async fn test_update_missing_draft() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(user_request(
            "PUT",
            "/drafts/api/999",
            Some("u1"),
            Some(json!({ "title": "x" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = setup_app(setup_test_db().await);
    let id = save(&app, "u1", hierarchy_draft()).await;
    let uri = format!("/drafts/api/{}", id);

    let response = app
        .clone()
        .oneshot(user_request("DELETE", &uri, Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Чернетку видалено");

    let response = app
        .oneshot(user_request("DELETE", &uri, Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_closed_database() {
    let db = setup_test_db().await;
    let app = setup_app(db.clone());
    db.close().await;

    let response = app
        .oneshot(user_request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_save_accepts_null_form_data() {
    let app = setup_app(setup_test_db().await);
    let mut draft = hierarchy_draft();
    draft["form_data"] = Value::Null;
    let id = save(&app, "u1", draft).await;

    let response = app
        .oneshot(user_request("GET", &format!("/drafts/api/{}", id), Some("u1"), None))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body["form_data"].is_null());
}

#[tokio::test]
async fn test_storage_failures_use_endpoint_messages() {
    let db = setup_test_db().await;
    let app = setup_app(db.clone());
    db.close().await;

    let response = app
        .clone()
        .oneshot(user_request("GET", "/drafts/api", Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Помилка отримання чернеток");

    let response = app
        .oneshot(user_request("GET", "/drafts/api/1", Some("u1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Помилка отримання чернетки");
}
