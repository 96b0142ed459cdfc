//! Every rejection shares the `{code, message, errors}` body.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use precinct_api::{ApiConfig, ApiError};
use precinct_test_utils::assertions::{assert_fields, assert_mentions};
use precinct_test_utils::fixtures::{agent_payload, case_payload};
use precinct_test_utils::AgentId;
use serde_json::{json, Value};

#[path = "support/http.rs"]
mod http_support;
use http_support::{error_fields, TestApp};

const UNKNOWN_ID: &str = "0190b4a4-7c1e-7cc3-9f1a-5d3b2e8c1a00";

async fn seeded_agent(app: &TestApp) -> String {
    app.create("/agents", &agent_payload("Ana Pereira", "2015-03-12", "inspector"))
        .await
}

fn assert_error(status: StatusCode, body: &Value, expected_status: StatusCode, code: &str) {
    assert_eq!(status, expected_status, "body: {}", body);
    assert_eq!(body["code"], code);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_validation_failure_lists_every_field() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/agents",
            &json!({"name": "Al", "incorporationDate": "2024-02-31", "role": "sheriff", "id": "x"}),
        )
        .await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_FAILED");
    let err: ApiError = serde_json::from_value(body).unwrap();
    assert_fields(&err.errors, &["name", "incorporationDate", "role", "id"]);
    assert!(err.errors[2].message.contains("inspector"));
}

#[tokio::test]
async fn test_future_and_impossible_dates_rejected() {
    let app = TestApp::new();
    for date in ["2025-06-02", "2023-02-29", "2024-13-01", "12/03/2015"] {
        let (status, body) = app
            .post("/agents", &agent_payload("Ana Pereira", date, "inspector"))
            .await;
        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_FAILED");
        assert_eq!(error_fields(&body), vec!["incorporationDate"], "date {}", date);
    }
    let (status, _) = app
        .post("/agents", &agent_payload("Ana Pereira", "2025-06-01", "inspector"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_empty_patch_rejected() {
    let app = TestApp::new();
    let id = seeded_agent(&app).await;
    let (status, body) = app.patch(&format!("/agents/{}", id), &json!({})).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_FAILED");
    assert!(body["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("at least one field"));
}

#[tokio::test]
async fn test_non_object_body_rejected() {
    let app = TestApp::new();
    let (status, body) = app.post("/cases", &json!(["title"])).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_FAILED");
    assert_eq!(error_fields(&body), vec!["body"]);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/agents")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "INVALID_INPUT");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/agents")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("Content-Type"));
}

#[tokio::test]
async fn test_malformed_path_id_rejected() {
    let app = TestApp::new();
    for uri in ["/agents/42", "/cases/not-a-uuid", "/cases/42/agent"] {
        let (status, body) = app.get(uri).await;
        assert_error(status, &body, StatusCode::BAD_REQUEST, "INVALID_FORMAT");
    }
    let simple_form = UNKNOWN_ID.replace('-', "");
    let (status, body) = app.delete(&format!("/agents/{}", simple_form)).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "INVALID_FORMAT");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get(&format!("/agents/{}", UNKNOWN_ID)).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "AGENT_NOT_FOUND");

    let (status, body) = app.delete(&format!("/cases/{}", UNKNOWN_ID)).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "CASE_NOT_FOUND");

    let (status, body) = app.get(&format!("/cases/{}/agent", UNKNOWN_ID)).await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "CASE_NOT_FOUND");
}

#[tokio::test]
async fn test_missing_agent_is_a_conflict() {
    let app = TestApp::new();
    let missing: AgentId = UNKNOWN_ID.parse().unwrap();
    let (status, body) = app
        .post("/cases", &case_payload("Vehicle theft", "Car stolen", "open", missing))
        .await;
    assert_error(status, &body, StatusCode::CONFLICT, "REFERENCED_AGENT_NOT_FOUND");
    let err: ApiError = serde_json::from_value(body).unwrap();
    assert_mentions(&err.errors, "agentId");

    let (_, cases) = app.get("/cases").await;
    assert_eq!(cases, json!([]));

    let ana = seeded_agent(&app).await;
    let case_id = app
        .create(
            "/cases",
            &case_payload("Vehicle theft", "Car stolen", "open", ana.parse().unwrap()),
        )
        .await;
    let (status, body) = app
        .patch(&format!("/cases/{}", case_id), &json!({"agentId": UNKNOWN_ID}))
        .await;
    assert_error(status, &body, StatusCode::CONFLICT, "REFERENCED_AGENT_NOT_FOUND");

    let (_, unchanged) = app.get(&format!("/cases/{}", case_id)).await;
    assert_eq!(unchanged["agentId"], ana.as_str());
}

#[tokio::test]
async fn test_validation_reported_before_conflict_and_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/cases", &json!({"title": "Vehicle theft", "status": "closed", "agentId": UNKNOWN_ID}))
        .await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_FAILED");
    assert_eq!(error_fields(&body), vec!["description", "status"]);

    let (status, body) = app
        .put(&format!("/cases/{}", UNKNOWN_ID), &json!({"title": "x"}))
        .await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_bad_queries_rejected() {
    let app = TestApp::new();
    for uri in [
        "/agents?sort=role",
        "/agents?role=sheriff",
        "/agents?role=",
        "/agents?page=2",
        "/cases?status=closed",
        "/cases?agentId=42",
        "/cases?q=%20%20",
        "/cases?sort=-agentId",
        "/cases/search",
        "/cases/search?q=",
        "/cases/search?q=theft&status=open",
    ] {
        let (status, body) = app.get(uri).await;
        assert_error(status, &body, StatusCode::BAD_REQUEST, "INVALID_QUERY");
    }
}

#[tokio::test]
async fn test_unmatched_route() {
    let app = TestApp::new();
    let (status, body) = app.get("/suspects").await;
    assert_error(status, &body, StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("/suspects"));
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_unsupported_method_has_error_body() {
    let app = TestApp::new();

    let (status, body) = app.put("/agents", &json!({})).await;
    assert_error(status, &body, StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED");
    assert!(body["message"].as_str().unwrap().contains("PUT"));

    let (status, body) = app.post("/cases/search", &json!({"q": "theft"})).await;
    assert_error(status, &body, StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED");
    assert!(body["message"].as_str().unwrap().contains("/cases/search"));

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/agents")
        .body(Body::empty())
        .unwrap();
    let response = app.raw(request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response.headers()[header::ALLOW].to_str().unwrap().to_string();
    assert!(allow.contains("GET") && allow.contains("POST"), "allow: {}", allow);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let config = ApiConfig {
        body_limit_bytes: 64,
        ..Default::default()
    };
    let app = TestApp::with_config(&config);
    let long_description = "x".repeat(256);
    let (status, body) = app
        .post(
            "/cases",
            &json!({"title": "Vehicle theft", "description": long_description}),
        )
        .await;
    assert_error(status, &body, StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE");
}
