use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use calcvault::{build_app, memory::MemoryStore, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

#[allow(dead_code)]
pub const PASSWORD: &str = "SecurePass123";

/// Router over a fresh in-memory store, plus the store for seeding.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(store.clone());
    (build_app(state.clone()), store, state)
}

#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// Sends one request and returns the status and JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[allow(dead_code)]
pub async fn register(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {}: {}", username, body);
    body
}

#[allow(dead_code)]
pub async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        form_request(
            "/api/users/login",
            &format!("username={}&password={}", username, PASSWORD),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {}: {}", username, body);
    body["access_token"].as_str().unwrap().to_string()
}

/// Registers and logs in `username`, returning a bearer token.
#[allow(dead_code)]
pub async fn signed_up(app: &Router, username: &str) -> String {
    register(app, username).await;
    login(app, username).await
}

#[allow(dead_code)]
pub async fn create_calc(app: &Router, token: &str, a: f64, b: f64, kind: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/calculations",
            Some(token),
            Some(json!({ "a": a, "b": b, "type": kind })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create: {}", body);
    body
}
