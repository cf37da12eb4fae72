//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection, startup retry and migrations
//! - SeaORM entities and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CartRepository, CartStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCartRepository, TxOrderRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCartRepository, MockOrderRepository, MockProductRepository, MockUserRepository,
};
