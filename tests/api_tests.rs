//! API tests driving the router over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use gearguard_server::{
    api::create_router, config::AppConfig, repository::Repository, services::Services, AppState,
};

fn app() -> Router {
    let services = Services::new(Repository::in_memory());
    create_router(AppState::new(AppConfig::default(), services))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", uri));
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

struct Seeded {
    bob: i64,
    charlie: i64,
    mechanics: i64,
    generator: i64,
}

/// Bob in Mechanics, Charlie unassigned, Generator X500 assigned to Mechanics/Bob
async fn seed(app: &Router) -> Seeded {
    let (status, bob) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({"email": "tech1@gearguard.com", "full_name": "Bob Fixit", "role": "technician"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, charlie) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({"email": "tech2@gearguard.com", "full_name": "Charlie Spark", "role": "technician"})),
    )
    .await;

    let (status, team) = send(
        app,
        Method::POST,
        "/teams",
        Some(json!({"name": "Mechanics", "member_ids": [bob["id"]]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, generator) = send(
        app,
        Method::POST,
        "/equipment",
        Some(json!({
            "name": "Generator X500",
            "serial_number": "GEN-2024-001",
            "category": "Heavy Machinery",
            "location": "Warehouse A",
            "assigned_team_id": team["id"],
            "assigned_technician_id": bob["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(generator["status"], "active");

    Seeded {
        bob: bob["id"].as_i64().expect("No user ID"),
        charlie: charlie["id"].as_i64().expect("No user ID"),
        mechanics: team["id"].as_i64().expect("No team ID"),
        generator: generator["id"].as_i64().expect("No equipment ID"),
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_request_inherits_equipment_assignment() {
    let app = app();
    let s = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Oil Leak Detected",
            "equipment_id": s.generator,
            "request_type": "corrective"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["team_id"], s.mechanics);
    assert_eq!(body["technician_id"], s.bob);
    assert_eq!(body["stage"], "new");
    assert_eq!(body["priority"], "normal");
    assert!(body["closed_at"].is_null());
}

#[tokio::test]
async fn test_scrap_stage_scraps_equipment() {
    let app = app();
    let s = seed(&app).await;
    let (_, request) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Engine seized",
            "equipment_id": s.generator,
            "request_type": "corrective"
        })),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/requests/{}/stage", request["id"]),
        Some(json!({"stage": "scrap"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["stage"], "scrap");
    assert!(updated["closed_at"].is_string());

    let (_, equipment) = send(&app, Method::GET, &format!("/equipment/{}", s.generator), None).await;
    assert_eq!(equipment["status"], "scrapped");
    assert_eq!(equipment["maintenance_count"], 1);

    // No new request may target scrapped equipment
    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Another look",
            "equipment_id": s.generator,
            "request_type": "corrective"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");

    let (_, requests) = send(&app, Method::GET, "/requests", None).await;
    assert_eq!(requests.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_preventive_without_date_rejected() {
    let app = app();
    let s = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Quarterly service",
            "equipment_id": s.generator,
            "request_type": "preventive"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Quarterly service",
            "equipment_id": s.generator,
            "request_type": "preventive",
            "scheduled_date": "2026-11-02T08:00:00Z",
            "duration": 2.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["duration"], 2.5);
}

#[tokio::test]
async fn test_technician_outside_team_rejected() {
    let app = app();
    let s = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Oil Leak Detected",
            "equipment_id": s.generator,
            "request_type": "corrective",
            "technician_id": s.charlie
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_missing_entities_are_not_found() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({"subject": "Ghost", "equipment_id": 999, "request_type": "corrective"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/requests/7/stage",
        Some(json!({"stage": "scrap"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/equipment/999/requests", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_delete_clears_assignment() {
    let app = app();
    let s = seed(&app).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/teams/{}", s.mechanics), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, equipment) = send(&app, Method::GET, &format!("/equipment/{}", s.generator), None).await;
    assert!(equipment["assigned_team_id"].is_null());
    assert_eq!(equipment["assigned_technician_id"], s.bob);

    // Without a team the technician is no longer checked against membership
    let (status, body) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({
            "subject": "Oil Leak Detected",
            "equipment_id": s.generator,
            "request_type": "corrective",
            "technician_id": s.charlie
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["team_id"].is_null());
}

#[tokio::test]
async fn test_list_filters() {
    let app = app();
    let s = seed(&app).await;
    for subject in ["First", "Second"] {
        send(
            &app,
            Method::POST,
            "/requests",
            Some(json!({"subject": subject, "equipment_id": s.generator, "request_type": "corrective"})),
        )
        .await;
    }
    send(
        &app,
        Method::PUT,
        "/requests/1/stage",
        Some(json!({"stage": "in_progress"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/requests?stage=in_progress", None).await;
    assert_eq!(status, StatusCode::OK);
    let requests = body.as_array().expect("Expected array");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["subject"], "First");

    let (_, body) = send(&app, Method::GET, "/equipment?status=active", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    let (_, body) = send(&app, Method::GET, "/equipment?status=scrapped", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_duplicate_team_name_conflicts() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::POST, "/teams", Some(json!({"name": "Mechanics"}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_input_returns_json_error() {
    let app = app();
    let s = seed(&app).await;
    let (_, request) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({"subject": "Oil Leak Detected", "equipment_id": s.generator, "request_type": "corrective"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/requests/{}/stage", request["id"]),
        Some(json!({"stage": "bogus"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::GET, "/equipment/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = send(&app, Method::GET, "/requests?stage=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    // The stage is unchanged
    let (_, request) = send(&app, Method::GET, &format!("/requests/{}", request["id"]), None).await;
    assert_eq!(request["stage"], "new");
}

#[tokio::test]
async fn test_equipment_update_clears_assignment() {
    let app = app();
    let s = seed(&app).await;

    let (status, equipment) = send(
        &app,
        Method::PUT,
        &format!("/equipment/{}", s.generator),
        Some(json!({"assigned_technician_id": null, "location": "Warehouse B"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(equipment["assigned_technician_id"].is_null());
    assert_eq!(equipment["assigned_team_id"], s.mechanics);
    assert_eq!(equipment["location"], "Warehouse B");

    let (_, request) = send(
        &app,
        Method::POST,
        "/requests",
        Some(json!({"subject": "Oil Leak Detected", "equipment_id": s.generator, "request_type": "corrective"})),
    )
    .await;
    assert_eq!(request["team_id"], s.mechanics);
    assert!(request["technician_id"].is_null());
}
