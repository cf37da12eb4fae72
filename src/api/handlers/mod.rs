//! HTTP request handlers.

pub mod auth_handler;
pub mod cart_handler;
pub mod order_handler;
pub mod product_handler;

pub use auth_handler::auth_routes;
pub use cart_handler::cart_routes;
pub use order_handler::order_routes;
pub use product_handler::product_routes;
