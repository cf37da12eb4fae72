//! Service Container - Centralized service access.
//!
//! Builds one Unit of Work over the shared connection pool and hands
//! the same instance to every service.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CartManager, CartService, OrderManager, OrderService,
    ProductManager, ProductService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn carts(&self) -> Arc<dyn CartService>;

    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    product_service: Arc<dyn ProductService>,
    cart_service: Arc<dyn CartService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            product_service: Arc::new(ProductManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
