// File: tests/test_helpers.rs

use std::sync::Arc;

use api_gateway::AppState;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use matching_engine::MatchingEngine;
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

/// Build an in-process app with a fresh, empty book
pub fn app() -> Router {
    let engine = MatchingEngine::new("BTC/USD");
    api_gateway::router(Arc::new(AppState {
        engine: RwLock::new(engine),
    }))
}

/// POST a JSON body and return the status plus the decoded response body
pub async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// GET a path and return the status plus the decoded response body
pub async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A limit order placement body in the wire shape
pub fn limit_order(id: u64, direction: &str, price: u64, quantity: u64) -> Value {
    serde_json::json!({
        "type": "limit",
        "order": {
            "id": id,
            "quantity": quantity,
            "price": price,
            "direction": direction
        }
    })
}
