//! Product catalog entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::CURRENCY_SCALE;
use crate::errors::{AppError, AppResult};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = "A very useful widget")]
    pub description: Option<String>,
    /// Current unit price
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5.00)]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable product fields, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl NewProduct {
    /// Price must be non-negative and fit the stored currency precision.
    pub fn validate_price(&self) -> AppResult<()> {
        if self.price < Decimal::ZERO {
            return Err(AppError::validation("Price must not be negative"));
        }

        if self.price.normalize().scale() > CURRENCY_SCALE {
            return Err(AppError::validation(format!(
                "Price must have at most {} decimal places",
                CURRENCY_SCALE
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product_with_price(price: Decimal) -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            description: None,
            price,
        }
    }

    #[test]
    fn test_valid_prices() {
        for price in [dec!(0), dec!(5.00), dec!(3.5), dec!(19.99), dec!(1.2000)] {
            assert!(product_with_price(price).validate_price().is_ok(), "{price}");
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = product_with_price(dec!(-0.01)).validate_price();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_sub_cent_price_rejected() {
        let result = product_with_price(dec!(1.005)).validate_price();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_price_serialized_as_number() {
        let product = Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            price: dec!(5.00),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], serde_json::json!(5.0));
        assert!(json["description"].is_null());
    }
}
