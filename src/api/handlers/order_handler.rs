//! Order handlers. Protected by the auth middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Order, OrderDetails};
use crate::errors::AppResult;

/// Checkout body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(range(min = 1, message = "cart_id must be positive"))]
    #[schema(example = 1)]
    pub cart_id: i32,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:order_id", get(get_order))
}

/// Convert a cart into an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Cart is empty or body invalid"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Cart not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .order_service
        .create_order(user.id, payload.cart_id)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Orders, oldest first", body = Vec<Order>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.order_service.list_orders(user.id).await?))
}

/// Get one order with its frozen lines
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    tag = "Orders",
    params(("order_id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order and its lines", body = OrderDetails),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(order_id): Path<i32>,
) -> AppResult<Json<OrderDetails>> {
    Ok(Json(state.order_service.get_order(user.id, order_id).await?))
}
