//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and every protected operation takes the
//! authenticated user id as an explicit argument.

mod auth_service;
mod cart_service;
pub mod container;
mod order_service;
mod product_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use cart_service::{CartManager, CartService};
pub use order_service::{OrderManager, OrderService};
pub use product_service::{ProductManager, ProductService};
