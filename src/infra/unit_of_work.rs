//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle used
//! by checkout: begin, run the closure, commit on `Ok`, roll back on `Err`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    self, CartRepository, CartStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
    UserRepository, UserStore,
};
use crate::domain::{Cart, CartLine, Order};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, implement it over mock repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn carts(&self) -> Arc<dyn CartRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back otherwise. Postgres runs it at read-committed isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get cart repository for this transaction
    pub fn carts(&self) -> TxCartRepository<'_> {
        TxCartRepository { txn: self.txn }
    }

    /// Get order repository for this transaction
    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    cart_repo: Arc<CartStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            cart_repo: Arc::new(CartStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            db,
        }
    }

    /// SQLite accepts neither setting and warns when given one.
    fn transaction_config(&self) -> (Option<IsolationLevel>, Option<AccessMode>) {
        match self.db.get_database_backend() {
            DatabaseBackend::Postgres => (
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            ),
            _ => (None, None),
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let (isolation_level, access_mode) = self.transaction_config();
        let txn = self
            .db
            .begin_with_config(isolation_level, access_mode)
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Cart access bound to an open transaction.
pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCartRepository<'a> {
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Cart>> {
        repositories::find_cart(self.txn, id).await
    }

    /// Lines with the catalog price as seen by this transaction
    pub async fn priced_lines(&self, cart_id: i32) -> AppResult<Vec<CartLine>> {
        repositories::load_lines(self.txn, cart_id).await
    }

    /// Delete every line of the cart, keeping the cart row.
    pub async fn clear(&self, cart_id: i32) -> AppResult<u64> {
        repositories::clear_lines(self.txn, cart_id).await
    }
}

/// Order writes bound to an open transaction.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    /// Insert a pending order header and return it with its generated id.
    pub async fn insert_header(&self, user_id: i32, total_amount: Decimal) -> AppResult<Order> {
        repositories::insert_header(self.txn, user_id, total_amount).await
    }

    /// Insert one frozen order line.
    pub async fn insert_line(&self, order_id: i32, line: &CartLine) -> AppResult<()> {
        repositories::insert_line(self.txn, order_id, line).await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
