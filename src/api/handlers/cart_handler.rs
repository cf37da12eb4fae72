//! Cart handlers. Every route here sits behind the auth middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Cart, CartDetails};
use crate::errors::AppResult;

/// Line addition body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    #[validate(range(min = 1, message = "product_id must be positive"))]
    #[schema(example = 1)]
    pub product_id: i32,
    /// Added to any quantity already in the cart
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "quantity must be between 1 and 2147483647"
    ))]
    #[schema(example = 2, minimum = 1)]
    pub quantity: i32,
}

/// Create cart routes
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart))
        .route("/:cart_id", get(get_cart))
        .route("/:cart_id/items", post(add_item))
        .route("/:cart_id/items/:product_id", delete(remove_item))
}

/// Open a new empty cart
#[utoipa::path(
    post,
    path = "/carts",
    tag = "Carts",
    responses(
        (status = 201, description = "Cart created", body = Cart),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_cart(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<Cart>)> {
    let cart = state.cart_service.create_cart(user.id).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Add a product to a cart
#[utoipa::path(
    post,
    path = "/carts/{cart_id}/items",
    tag = "Carts",
    params(("cart_id" = i32, Path, description = "Cart ID")),
    request_body = AddItemRequest,
    responses(
        (status = 204, description = "Line added or merged"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Cart not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(cart_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AddItemRequest>,
) -> AppResult<StatusCode> {
    state
        .cart_service
        .add_item(user.id, cart_id, payload.product_id, payload.quantity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a cart with its priced lines
#[utoipa::path(
    get,
    path = "/carts/{cart_id}",
    tag = "Carts",
    params(("cart_id" = i32, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart and its lines", body = CartDetails),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Cart not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(cart_id): Path<i32>,
) -> AppResult<Json<CartDetails>> {
    Ok(Json(state.cart_service.get_cart(user.id, cart_id).await?))
}

/// Remove a product from a cart
#[utoipa::path(
    delete,
    path = "/carts/{cart_id}/items/{product_id}",
    tag = "Carts",
    params(
        ("cart_id" = i32, Path, description = "Cart ID"),
        ("product_id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Line removed, or was not there"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Cart not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((cart_id, product_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state
        .cart_service
        .remove_item(user.id, cart_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
