//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod cart;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use cart::{Cart, CartDetails, CartLine};
pub use order::{Order, OrderDetails, OrderDraft, OrderLine};
pub use password::Password;
pub use product::{NewProduct, Product};
pub use user::{User, UserResponse};
