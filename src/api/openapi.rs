//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, cart_handler, order_handler, product_handler};
use crate::domain::{
    Cart, CartDetails, CartLine, Order, OrderDetails, OrderLine, Product, UserResponse,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the storefront
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Accounts, product catalog, carts and checkout"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        auth_handler::signup,
        auth_handler::login,
        product_handler::list_products,
        product_handler::create_product,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::delete_product,
        cart_handler::create_cart,
        cart_handler::add_item,
        cart_handler::get_cart,
        cart_handler::remove_item,
        order_handler::create_order,
        order_handler::list_orders,
        order_handler::get_order,
    ),
    components(
        schemas(
            UserResponse,
            auth_handler::CredentialsRequest,
            TokenResponse,
            Product,
            product_handler::ProductRequest,
            Cart,
            CartLine,
            CartDetails,
            cart_handler::AddItemRequest,
            Order,
            OrderLine,
            OrderDetails,
            order_handler::CreateOrderRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Signup and login"),
        (name = "Products", description = "Catalog management"),
        (name = "Carts", description = "Shopping carts of the current user"),
        (name = "Orders", description = "Checkout and order history")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /users/login"))
                        .build(),
                ),
            );
        }
    }
}
