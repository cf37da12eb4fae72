//! Product catalog handlers. All public.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NewProduct, Product};
use crate::errors::AppResult;

/// Product create/update body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = "A very useful widget")]
    pub description: Option<String>,
    /// Unit price, at most two decimal places
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5.00)]
    pub price: Decimal,
}

impl From<ProductRequest> for NewProduct {
    fn from(request: ProductRequest) -> Self {
        NewProduct {
            name: request.name,
            description: request.description,
            price: request.price,
        }
    }
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List the catalog
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products ordered by id", body = Vec<Product>)
    )
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.product_service.list_products().await?))
}

/// Add a product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.product_service.create_product(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.product_service.get_product(id).await?))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<StatusCode> {
    state
        .product_service
        .update_product(id, payload.into())
        .await?;
    Ok(StatusCode::OK)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Invalid id")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
