//! Cart service - cart lifecycle for the authenticated user.
//!
//! Every operation takes the caller's user id explicitly. A cart that
//! belongs to someone else is reported exactly like a missing one.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{MAX_LINE_QUANTITY, MIN_LINE_QUANTITY};
use crate::domain::{Cart, CartDetails};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Cart service trait for dependency injection.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn create_cart(&self, user_id: i32) -> AppResult<Cart>;

    /// Add to a line, merging with any existing quantity
    async fn add_item(
        &self,
        user_id: i32,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<()>;

    /// Cart with lines priced at the current catalog price
    async fn get_cart(&self, user_id: i32, cart_id: i32) -> AppResult<CartDetails>;

    /// Remove a line; absent lines are not an error
    async fn remove_item(&self, user_id: i32, cart_id: i32, product_id: i32) -> AppResult<()>;
}

/// Concrete implementation of CartService using Unit of Work.
pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned_cart(&self, user_id: i32, cart_id: i32) -> AppResult<Cart> {
        self.uow
            .carts()
            .find_by_id(cart_id)
            .await?
            .filter(|cart| cart.is_owned_by(user_id))
            .ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn create_cart(&self, user_id: i32) -> AppResult<Cart> {
        self.uow.carts().create(user_id).await
    }

    async fn add_item(
        &self,
        user_id: i32,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> AppResult<()> {
        if quantity < MIN_LINE_QUANTITY {
            return Err(AppError::validation("Quantity must be greater than zero"));
        }

        let cart = self.owned_cart(user_id, cart_id).await?;

        let held = self
            .uow
            .carts()
            .line_quantity(cart.id, product_id)
            .await?
            .unwrap_or(0);
        if held
            .checked_add(quantity)
            .map_or(true, |merged| merged > MAX_LINE_QUANTITY)
        {
            return Err(AppError::validation(format!(
                "Line quantity cannot exceed {}",
                MAX_LINE_QUANTITY
            )));
        }

        self.uow.carts().add_item(cart.id, product_id, quantity).await
    }

    async fn get_cart(&self, user_id: i32, cart_id: i32) -> AppResult<CartDetails> {
        let cart = self.owned_cart(user_id, cart_id).await?;
        let items = self.uow.carts().lines(cart.id).await?;

        Ok(CartDetails { cart, items })
    }

    async fn remove_item(&self, user_id: i32, cart_id: i32, product_id: i32) -> AppResult<()> {
        let cart = self.owned_cart(user_id, cart_id).await?;
        self.uow.carts().remove_item(cart.id, product_id).await
    }
}
