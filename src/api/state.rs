//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CartService, OrderService, ProductService, ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub product_service: Arc<dyn ProductService>,
    pub cart_service: Arc<dyn CartService>,
    pub order_service: Arc<dyn OrderService>,
    /// Browser origin allowed by CORS, any origin when unset
    pub cors_allowed_origin: Option<String>,
}

impl AppState {
    /// Create application state over the shared connection pool.
    pub fn from_config(database: &Database, config: Config) -> Self {
        let cors_allowed_origin = config.cors_allowed_origin.clone();
        let container = Services::from_connection(database.get_connection(), config);

        Self::from_container(&container, cors_allowed_origin)
    }

    /// Create application state from any service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        cors_allowed_origin: Option<String>,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            product_service: container.products(),
            cart_service: container.carts(),
            order_service: container.orders(),
            cors_allowed_origin,
        }
    }
}
