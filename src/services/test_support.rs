//! Unit of Work over mock repositories for service unit tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    CartRepository, MockCartRepository, MockOrderRepository, MockProductRepository,
    MockUserRepository, OrderRepository, ProductRepository, TransactionContext, UnitOfWork,
    UserRepository,
};

/// Repositories left unset are bare mocks and panic when called.
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
    carts: Arc<MockCartRepository>,
    orders: Arc<MockOrderRepository>,
}

#[derive(Default)]
pub(crate) struct TestUnitOfWorkBuilder {
    users: Option<MockUserRepository>,
    products: Option<MockProductRepository>,
    carts: Option<MockCartRepository>,
    orders: Option<MockOrderRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn builder() -> TestUnitOfWorkBuilder {
        TestUnitOfWorkBuilder::default()
    }
}

impl TestUnitOfWorkBuilder {
    pub(crate) fn users(mut self, repo: MockUserRepository) -> Self {
        self.users = Some(repo);
        self
    }

    pub(crate) fn products(mut self, repo: MockProductRepository) -> Self {
        self.products = Some(repo);
        self
    }

    pub(crate) fn carts(mut self, repo: MockCartRepository) -> Self {
        self.carts = Some(repo);
        self
    }

    pub(crate) fn orders(mut self, repo: MockOrderRepository) -> Self {
        self.orders = Some(repo);
        self
    }

    pub(crate) fn build(self) -> TestUnitOfWork {
        TestUnitOfWork {
            users: Arc::new(self.users.unwrap_or_default()),
            products: Arc::new(self.products.unwrap_or_default()),
            carts: Arc::new(self.carts.unwrap_or_default()),
            orders: Arc::new(self.orders.unwrap_or_default()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transactions need a real connection; see the tests/ directory.
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
