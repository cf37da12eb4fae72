//! Product service - catalog CRUD.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewProduct, Product};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: i32) -> AppResult<Product>;

    async fn create_product(&self, product: NewProduct) -> AppResult<Product>;

    /// Overwrite a product. Unknown ids are silently ignored.
    async fn update_product(&self, id: i32, product: NewProduct) -> AppResult<()>;

    /// Delete a product. Unknown ids are silently ignored.
    async fn delete_product(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.uow.products().list().await
    }

    async fn get_product(&self, id: i32) -> AppResult<Product> {
        self.uow.products().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        product.validate_price()?;
        let created = self.uow.products().create(product).await?;

        tracing::info!(product_id = created.id, "Product created");
        Ok(created)
    }

    async fn update_product(&self, id: i32, product: NewProduct) -> AppResult<()> {
        product.validate_price()?;
        self.uow.products().update(id, product).await
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        self.uow.products().delete(id).await
    }
}
