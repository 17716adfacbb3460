// File: tests/integration_tests.rs

mod test_helpers;

use axum::http::StatusCode;
use serde_json::json;
use test_helpers::{app, get, limit_order, post_json};

#[tokio::test]
async fn test_place_and_match_orders() {
    let app = app();

    // A resting buy followed by a crossing sell produces one trade
    let (status, body) = post_json(app.clone(), "/api/v1/orders", limit_order(1, "buy", 100, 10)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["status"], json!("Resting"));
    assert_eq!(body["data"]["trades"], json!([]));

    let (status, body) = post_json(app.clone(), "/api/v1/orders", limit_order(2, "sell", 100, 10)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["trades"],
        json!([{"buyOrderId": 1, "sellOrderId": 2, "price": 100, "quantity": 10}])
    );
    assert_eq!(body["data"]["order"]["status"], json!("Filled"));
    assert_eq!(body["data"]["order"]["remainingQuantity"], json!(0));

    // Both sides are empty afterwards
    let (status, body) = get(app, "/api/v1/book").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"buyOrders": [], "sellOrders": []})
    );
}

#[tokio::test]
async fn test_book_snapshot_priority_order() {
    let app = app();

    post_json(app.clone(), "/api/v1/orders", limit_order(1, "buy", 99, 1)).await;
    post_json(app.clone(), "/api/v1/orders", limit_order(2, "buy", 101, 2)).await;
    post_json(app.clone(), "/api/v1/orders", limit_order(3, "sell", 110, 3)).await;
    post_json(app.clone(), "/api/v1/orders", limit_order(4, "sell", 105, 4)).await;

    let (status, body) = get(app, "/api/v1/book").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "buyOrders": [
                {"id": 2, "quantity": 2, "price": 101},
                {"id": 1, "quantity": 1, "price": 99}
            ],
            "sellOrders": [
                {"id": 4, "quantity": 4, "price": 105},
                {"id": 3, "quantity": 3, "price": 110}
            ]
        })
    );
}

#[tokio::test]
async fn test_duplicate_order_id_conflict() {
    let app = app();

    let (status, _) = post_json(app.clone(), "/api/v1/orders", limit_order(1, "buy", 99, 10)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(app.clone(), "/api/v1/orders", limit_order(1, "buy", 99, 10)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("duplicate_order_id"));

    // The book still holds only the original order
    let (_, body) = get(app, "/api/v1/book").await;
    assert_eq!(body["data"]["buyOrders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejects_unsupported_order_type() {
    let app = app();

    let body = json!({
        "type": "market",
        "order": {"id": 1, "quantity": 10, "price": 100, "direction": "buy"}
    });
    let (status, body) = post_json(app, "/api/v1/orders", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));
}

#[tokio::test]
async fn test_rejects_unknown_direction() {
    let app = app();

    let (status, body) = post_json(app, "/api/v1/orders", limit_order(1, "hold", 100, 10)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("validation_error"));
}

#[tokio::test]
async fn test_rejects_zero_quantity() {
    let app = app();

    let (status, body) = post_json(app, "/api/v1/orders", limit_order(1, "buy", 100, 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));
}

#[tokio::test]
async fn test_direction_is_case_insensitive() {
    let app = app();

    let (status, body) = post_json(app.clone(), "/api/v1/orders", limit_order(1, "BUY", 100, 10)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["side"], json!("buy"));

    let (status, _) = post_json(app, "/api/v1/orders", limit_order(2, "Sell", 120, 10)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_resting_order() {
    let app = app();

    post_json(app.clone(), "/api/v1/orders", limit_order(5, "buy", 100, 10)).await;

    let (status, body) = get(app.clone(), "/api/v1/orders/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(5));
    assert_eq!(body["data"]["remainingQuantity"], json!(10));

    // Unknown ids are a 404
    let (status, body) = get(app, "/api/v1/orders/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("not_found"));
}

#[tokio::test]
async fn test_filled_order_is_no_longer_addressable() {
    let app = app();

    post_json(app.clone(), "/api/v1/orders", limit_order(1, "buy", 100, 10)).await;
    post_json(app.clone(), "/api/v1/orders", limit_order(2, "sell", 100, 10)).await;

    let (status, _) = get(app, "/api/v1/orders/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_fill_via_api() {
    let app = app();

    post_json(app.clone(), "/api/v1/orders", limit_order(1, "buy", 101, 5)).await;
    let (status, body) = post_json(app.clone(), "/api/v1/orders", limit_order(2, "sell", 100, 10)).await;
    assert_eq!(status, StatusCode::OK);

    // The trade is recorded at the buy-side price
    assert_eq!(
        body["data"]["trades"],
        json!([{"buyOrderId": 1, "sellOrderId": 2, "price": 101, "quantity": 5}])
    );

    // The sell remainder rests at its own limit price
    let (_, body) = get(app, "/api/v1/book").await;
    assert_eq!(
        body["data"],
        json!({
            "buyOrders": [],
            "sellOrders": [{"id": 2, "quantity": 5, "price": 100}]
        })
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();

    let (status, body) = get(app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], json!("Meridian Exchange API"));
}
