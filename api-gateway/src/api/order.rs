//! Order API handlers
//!
//! Handlers for order management endpoints including:
//! - Place new orders
//! - Get order details

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use common::model::order::{Order, OrderKind, OrderRequest, Side};
use common::model::trade::Trade;
use common::units::{OrderId, Price, Quantity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Place order request, as received on the wire
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    /// Order type; only "limit" is supported
    #[serde(rename = "type")]
    pub kind: String,
    /// The order fields
    pub order: OrderPayload,
}

/// The order fields of a placement request
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderPayload {
    /// Requested order id
    pub id: OrderId,
    /// Requested quantity
    pub quantity: Quantity,
    /// Limit price in the smallest price unit
    pub price: Price,
    /// Order direction, "buy" or "sell" (case-insensitive)
    pub direction: String,
}

impl PlaceOrderRequest {
    /// Validate the raw request into the shape the matching core consumes
    fn validate(self) -> Result<OrderRequest, ApiError> {
        if !self.kind.eq_ignore_ascii_case("limit") {
            return Err(ApiError::BadRequest(format!(
                "unsupported order type: {}",
                self.kind
            )));
        }
        let side = self.order.direction.parse::<Side>()?;
        if self.order.quantity == 0 {
            return Err(ApiError::BadRequest(
                "order quantity must be positive".to_string(),
            ));
        }
        Ok(OrderRequest {
            id: self.order.id,
            side,
            kind: OrderKind::Limit,
            price: self.order.price,
            quantity: self.order.quantity,
        })
    }
}

/// Order placement result
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPlacementResult {
    /// The placed order after matching
    pub order: Order,
    /// Trades that were generated, in execution order
    pub trades: Vec<Trade>,
}

/// Place a new order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed successfully"),
        (status = 400, description = "Invalid order request"),
        (status = 409, description = "Duplicate order id"),
        (status = 500, description = "Internal server error")
    ),
    tag = "order"
)]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<ApiResponse<OrderPlacementResult>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let request = request.validate()?;

    tracing::info!(
        "[{}] placing order {} ({:?} {} @ {})",
        request_id,
        request.id,
        request.side,
        request.quantity,
        request.price
    );

    // The write lock spans the whole admit/insert/match sequence
    let result = state.engine.write().await.place(&request)?;

    let placement_result = OrderPlacementResult {
        order: result.taker_order,
        trades: result.trades,
    };

    // Return standardized response
    Ok(ApiResponse::with_request_id(placement_result, request_id))
}

/// Get a resting order by ID
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = u64, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Order retrieved successfully"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "order"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<OrderId>,
) -> Result<ApiResponse<Order>, ApiError> {
    // Only resting orders are addressable; filled orders leave the book
    let order = state
        .engine
        .read()
        .await
        .get_order(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {}", id)))?;

    Ok(ApiResponse::new(order))
}
