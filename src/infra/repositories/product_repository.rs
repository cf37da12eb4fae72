//! Product catalog repository.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set,
    Statement,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ascending id
    async fn list(&self) -> AppResult<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// Insert a product. An empty catalog restarts the id sequence at 1 first.
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Overwrite every writable field. Missing ids are not an error.
    async fn update(&self, id: i32, product: NewProduct) -> AppResult<()>;

    /// Delete by id. Missing ids are not an error.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn reset_id_sequence(&self) -> AppResult<()> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DatabaseBackend::Postgres => "ALTER SEQUENCE products_id_seq RESTART WITH 1",
            DatabaseBackend::Sqlite => "DELETE FROM sqlite_sequence WHERE name = 'products'",
            DatabaseBackend::MySql => "ALTER TABLE products AUTO_INCREMENT = 1",
        };

        self.db
            .execute(Statement::from_string(backend, sql.to_string()))
            .await?;

        tracing::debug!("Product catalog empty, id sequence restarted");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        if ProductEntity::find().count(&self.db).await? == 0 {
            self.reset_id_sequence().await?;
        }

        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: i32, product: NewProduct) -> AppResult<()> {
        ProductEntity::update_many()
            .col_expr(product::Column::Name, Expr::value(product.name))
            .col_expr(product::Column::Description, Expr::value(product.description))
            .col_expr(product::Column::Price, Expr::value(product.price))
            .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
