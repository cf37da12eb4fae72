//! Order service - checkout and order history.
//!
//! Checkout runs as one transaction in a fixed statement order:
//! read priced lines, insert header, insert lines, clear the cart, commit.
//! Any failure rolls the whole unit back, so an order never exists
//! without its lines and a cart is never partially drained.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Order, OrderDetails, OrderDraft};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Convert the caller's cart into a pending order
    async fn create_order(&self, user_id: i32, cart_id: i32) -> AppResult<Order>;

    /// Orders placed by the caller, oldest first
    async fn list_orders(&self, user_id: i32) -> AppResult<Vec<Order>>;

    /// One of the caller's orders with its frozen lines
    async fn get_order(&self, user_id: i32, order_id: i32) -> AppResult<OrderDetails>;
}

/// Body of the checkout transaction.
///
/// Prices are read through the transaction, so the header total and the
/// frozen line prices come from the same snapshot.
async fn place_order(ctx: TransactionContext<'_>, user_id: i32, cart_id: i32) -> AppResult<Order> {
    let carts = ctx.carts();
    let cart = carts
        .find_by_id(cart_id)
        .await?
        .filter(|cart| cart.is_owned_by(user_id))
        .ok_or_not_found()?;

    let draft = OrderDraft::from_lines(carts.priced_lines(cart.id).await?)?;

    let orders = ctx.orders();
    let order = orders.insert_header(user_id, draft.total_amount).await?;
    for line in &draft.lines {
        orders.insert_line(order.id, line).await?;
    }

    carts.clear(cart.id).await?;
    Ok(order)
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn create_order(&self, user_id: i32, cart_id: i32) -> AppResult<Order> {
        let order = with_transaction!(self.uow, |ctx| place_order(ctx, user_id, cart_id).await)?;

        tracing::info!(
            order_id = order.id,
            user_id,
            cart_id,
            total = %order.total_amount,
            "Order placed"
        );
        Ok(order)
    }

    async fn list_orders(&self, user_id: i32) -> AppResult<Vec<Order>> {
        self.uow.orders().list_for_user(user_id).await
    }

    async fn get_order(&self, user_id: i32, order_id: i32) -> AppResult<OrderDetails> {
        let order = self
            .uow
            .orders()
            .find_by_id(order_id)
            .await?
            .filter(|order| order.user_id == user_id)
            .ok_or_not_found()?;

        let items = self.uow.orders().items(order.id).await?;
        Ok(OrderDetails { order, items })
    }
}
