//! Order book view handlers

use std::sync::Arc;

use axum::extract::State;
use common::model::book::BookSnapshot;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Get the order book snapshot
#[utoipa::path(
    get,
    path = "/api/v1/book",
    responses(
        (status = 200, description = "Order book snapshot retrieved successfully"),
        (status = 500, description = "Internal server error")
    ),
    tag = "book"
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<BookSnapshot>, ApiError> {
    let snapshot = state.engine.read().await.snapshot();

    // Return standardized response
    Ok(ApiResponse::new(snapshot))
}
