//! Order types and the pricing step of checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::cart::CartLine;
use crate::errors::{AppError, AppResult};

/// Order header. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    /// Sum of quantity times frozen unit price over every line
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.00)]
    pub total_amount: Decimal,
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Order line with the unit price captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    #[schema(example = 1)]
    pub order_id: i32,
    #[schema(example = 1)]
    pub product_id: i32,
    #[schema(example = 2)]
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5.00)]
    pub unit_price: Decimal,
    #[schema(example = "Widget")]
    pub product_name: String,
}

/// Order with its lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// A priced order that has not been persisted yet.
///
/// Built from the cart lines read inside the checkout transaction, so the
/// header total and every frozen unit price come from the same read.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub total_amount: Decimal,
    pub lines: Vec<CartLine>,
}

impl OrderDraft {
    /// Price a set of cart lines.
    ///
    /// # Errors
    /// Returns [`AppError::EmptyCart`] when there is nothing to order.
    pub fn from_lines(lines: Vec<CartLine>) -> AppResult<Self> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let total_amount = lines
            .iter()
            .map(|line| Decimal::from(line.quantity) * line.unit_price)
            .sum();

        Ok(Self {
            total_amount,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(product_id: i32, quantity: i32, unit_price: Decimal) -> CartLine {
        CartLine {
            cart_id: 1,
            product_id,
            quantity,
            product_name: format!("product-{product_id}"),
            unit_price,
        }
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let draft =
            OrderDraft::from_lines(vec![line(1, 2, dec!(5.00)), line(2, 1, dec!(3.50))]).unwrap();

        assert_eq!(draft.total_amount, dec!(13.50));
        assert_eq!(draft.lines.len(), 2);
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(OrderDraft::from_lines(Vec::new()), Err(AppError::EmptyCart)));
    }

    #[test]
    fn test_many_cent_lines_do_not_drift() {
        let lines = (1..=1000).map(|id| line(id, 3, dec!(0.10))).collect();
        let draft = OrderDraft::from_lines(lines).unwrap();

        assert_eq!(draft.total_amount, dec!(300.00));
    }

    #[test]
    fn test_free_products_allowed() {
        let draft = OrderDraft::from_lines(vec![line(1, 4, dec!(0.00))]).unwrap();
        assert_eq!(draft.total_amount, Decimal::ZERO);
    }
}
