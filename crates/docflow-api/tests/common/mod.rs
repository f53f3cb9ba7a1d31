//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, TimeDelta};
use docflow_core::availability::Availability;
use docflow_core::backend::DocumentBackend;
use docflow_core::identity::AnonymousIdentityProvider;
use docflow_session::{Workspace, WorkspaceConfig};
use docflow_store::memory::InMemoryBackend;
use docflow_test_support::{FixedCalendar, FixedClock};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use docflow_api::routes;
use docflow_api::state::AppState;

/// Fixed date used across all integration tests.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Build the full app router over an in-memory store, a fixed clock and a
/// calendar that always answers `availability`.
pub fn build_test_app_with(
    backend: Arc<dyn DocumentBackend>,
    availability: Availability,
) -> Router {
    let workspace = Workspace::new(
        backend,
        Arc::new(AnonymousIdentityProvider),
        Arc::new(FixedClock::on(today())),
        Arc::new(FixedCalendar(availability)),
        WorkspaceConfig {
            app_id: "test-app".to_owned(),
            notice_ttl: TimeDelta::seconds(3),
        },
    );
    routes::router().with_state(AppState::new(Arc::new(workspace)))
}

/// Build the full app router with a free calendar.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(InMemoryBackend::new()), Availability::Available)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PATCH request with a JSON body and return the response.
pub async fn patch_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, json_request("PATCH", uri, body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Sign in anonymously and return the actor id.
pub async fn sign_in(app: &Router) -> String {
    let (status, body) = post_json(app.clone(), "/api/v1/session", &serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK, "sign-in failed: {body}");
    body["actorId"].as_str().unwrap().to_owned()
}

/// Poll GET `uri` until `done` holds for the body. Writes reach the ledger
/// through the subscription, so reads after a write are eventually
/// consistent.
pub async fn eventually(app: &Router, uri: &str, done: impl Fn(&Value) -> bool) -> Value {
    for _ in 0..200 {
        let (status, body) = get_json(app.clone(), uri).await;
        if status == StatusCode::OK && done(&body) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition on {uri} never held");
}

/// Messages of the currently visible notices.
pub async fn notice_messages(app: &Router) -> Vec<String> {
    let (_, body) = get_json(app.clone(), "/api/v1/notices").await;
    body.as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap().to_owned())
        .collect()
}
