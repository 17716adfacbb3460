// api-gateway/src/lib.rs
pub mod api;
pub mod config;
pub mod error;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use matching_engine::MatchingEngine;
use tokio::sync::RwLock;
use utoipa::OpenApi;

/// App state shared across handlers
pub struct AppState {
    /// The matching engine behind one exclusive lock, so the whole
    /// admit/insert/match sequence of a submission never interleaves with
    /// another book operation
    pub engine: RwLock<MatchingEngine>,
}

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        api::order::place_order,
        api::order::get_order,
        api::book::get_book,
    ),
    components(
        schemas(
            api::order::PlaceOrderRequest,
            api::order::OrderPayload,
            api::order::OrderPlacementResult,
            common::model::order::Order,
            common::model::order::Side,
            common::model::order::OrderKind,
            common::model::order::Status,
            common::model::trade::Trade,
            common::model::book::BookSnapshot,
            common::model::book::OrderSummary,
        )
    ),
    tags(
        (name = "order", description = "Order placement and lookup endpoints"),
        (name = "book", description = "Order book view endpoints")
    ),
    info(
        title = "Meridian Exchange API",
        version = "1.0.0",
        description = "API for the exchange allowing limit order placement and order book access"
    )
)]
pub struct ApiDoc;

/// Build the API router for the given state
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/orders", post(api::order::place_order))
        .route("/orders/:id", get(api::order::get_order))
        .route("/book", get(api::book::get_book));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
