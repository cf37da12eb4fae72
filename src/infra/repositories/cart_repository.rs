//! Cart repository: cart headers and their merged lines.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Alias, Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use super::entities::{
    cart::{ActiveModel as CartActiveModel, Entity as CartEntity},
    cart_item::{self, ActiveModel as CartItemActiveModel, Entity as CartItemEntity},
    product::Entity as ProductEntity,
};
use crate::domain::{Cart, CartLine};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cart repository trait for dependency injection.
///
/// Ownership is not checked here; callers pass carts they already
/// resolved for the current user.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn create(&self, user_id: i32) -> AppResult<Cart>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Cart>>;

    /// Add `quantity` of a product, summing into an existing line.
    async fn add_item(&self, cart_id: i32, product_id: i32, quantity: i32) -> AppResult<()>;

    /// Quantity currently held by a line, if the line exists.
    async fn line_quantity(&self, cart_id: i32, product_id: i32) -> AppResult<Option<i32>>;

    /// Lines joined with current product name and price, by product id.
    async fn lines(&self, cart_id: i32) -> AppResult<Vec<CartLine>>;

    /// Remove a line. Removing an absent line succeeds.
    async fn remove_item(&self, cart_id: i32, product_id: i32) -> AppResult<()>;
}

/// Concrete implementation of CartRepository
pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn create(&self, user_id: i32) -> AppResult<Cart> {
        let active_model = CartActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Cart::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Cart>> {
        find_cart(&self.db, id).await
    }

    async fn add_item(&self, cart_id: i32, product_id: i32, quantity: i32) -> AppResult<()> {
        let line = CartItemActiveModel {
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
        };

        let merge = OnConflict::columns([cart_item::Column::CartId, cart_item::Column::ProductId])
            .value(
                cart_item::Column::Quantity,
                Expr::col((CartItemEntity, cart_item::Column::Quantity))
                    .add(Expr::col((Alias::new("excluded"), cart_item::Column::Quantity))),
            )
            .to_owned();

        CartItemEntity::insert(line)
            .on_conflict(merge)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| AppError::from_missing_reference(e, "product"))?;

        Ok(())
    }

    async fn line_quantity(&self, cart_id: i32, product_id: i32) -> AppResult<Option<i32>> {
        let line = CartItemEntity::find_by_id((cart_id, product_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(line.map(|line| line.quantity))
    }

    async fn lines(&self, cart_id: i32) -> AppResult<Vec<CartLine>> {
        load_lines(&self.db, cart_id).await
    }

    async fn remove_item(&self, cart_id: i32, product_id: i32) -> AppResult<()> {
        CartItemEntity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}

pub(crate) async fn find_cart<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Cart>> {
    let result = CartEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(Cart::from))
}

pub(crate) async fn load_lines<C: ConnectionTrait>(db: &C, cart_id: i32) -> AppResult<Vec<CartLine>> {
    let rows = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .find_also_related(ProductEntity)
        .order_by_asc(cart_item::Column::ProductId)
        .all(db)
        .await
        .map_err(AppError::from)?;

    // Lines go away with their product, so the join never misses.
    Ok(rows
        .into_iter()
        .filter_map(|(item, product)| {
            product.map(|product| CartLine {
                cart_id: item.cart_id,
                product_id: item.product_id,
                quantity: item.quantity,
                product_name: product.name,
                unit_price: product.price,
            })
        })
        .collect())
}

pub(crate) async fn clear_lines<C: ConnectionTrait>(db: &C, cart_id: i32) -> AppResult<u64> {
    let result = CartItemEntity::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .exec(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.rows_affected)
}
