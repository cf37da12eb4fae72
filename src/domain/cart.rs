//! Shopping cart types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cart header. The row is never updated; only its lines change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Cart line joined with the product's current name and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    #[schema(example = 1)]
    pub cart_id: i32,
    #[schema(example = 1)]
    pub product_id: i32,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "Widget")]
    pub product_name: String,
    /// Live catalog price, not frozen
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5.00)]
    pub unit_price: Decimal,
}

/// Cart with its current lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartDetails {
    pub cart: Cart,
    pub items: Vec<CartLine>,
}

impl Cart {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}
