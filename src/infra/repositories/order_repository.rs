//! Order repository: read side plus the inserts used by checkout.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use super::entities::{
    order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity},
    order_item::{self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity},
    product::Entity as ProductEntity,
};
use crate::config::ORDER_STATUS_PENDING;
use crate::domain::{CartLine, Order, OrderLine};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
///
/// Orders are only ever written by the checkout transaction, so this
/// trait is read-only.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Orders placed by a user, oldest first
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Order>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>>;

    /// Frozen lines of an order joined with product name
    async fn items(&self, order_id: i32) -> AppResult<Vec<OrderLine>>;
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_asc(order::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Order::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        let result = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Order::from))
    }

    async fn items(&self, order_id: i32) -> AppResult<Vec<OrderLine>> {
        let rows = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .find_also_related(ProductEntity)
            .order_by_asc(order_item::Column::ProductId)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(item, product)| OrderLine {
                order_id: item.order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                product_name: product.map(|p| p.name).unwrap_or_default(),
            })
            .collect())
    }
}

pub(crate) async fn insert_header<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    total_amount: rust_decimal::Decimal,
) -> AppResult<Order> {
    let active_model = OrderActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        total_amount: Set(total_amount),
        status: Set(ORDER_STATUS_PENDING.to_string()),
        created_at: Set(chrono::Utc::now()),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    Ok(Order::from(model))
}

pub(crate) async fn insert_line<C: ConnectionTrait>(
    db: &C,
    order_id: i32,
    line: &CartLine,
) -> AppResult<()> {
    let active_model = OrderItemActiveModel {
        order_id: Set(order_id),
        product_id: Set(line.product_id),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
    };

    OrderItemEntity::insert(active_model)
        .exec_without_returning(db)
        .await
        .map_err(AppError::from)?;

    Ok(())
}
