//! Shared harness: the real router over an in-memory SQLite store.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::api::create_router;
use storefront_api::infra::Database;
use storefront_api::{AppState, Config};

pub const SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub struct TestApp {
    pub router: Router,
    pub db: Database,
}

impl TestApp {
    /// Fresh schema per call. A single pooled connection keeps the
    /// in-memory database alive and shared.
    pub async fn spawn() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options)
            .await
            .expect("open in-memory sqlite");
        let db = Database::from_connection(connection);
        db.run_migrations().await.expect("apply migrations");

        let config = Config::new("sqlite::memory:", SECRET).expect("valid config");
        let router = create_router(AppState::from_config(&db, config));

        Self { router, db }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.raw_request(method, uri, token, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn raw_request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    /// Register and log in, returning the session token
    pub async fn login_as(&self, email: &str) -> String {
        let credentials = json!({ "email": email, "password": "p" });

        let (status, _) = self
            .request(Method::POST, "/users/signup", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .request(Method::POST, "/users/login", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_product(&self, name: &str, price: f64) -> i64 {
        let (status, body) = self
            .request(
                Method::POST,
                "/products",
                None,
                Some(json!({ "name": name, "description": null, "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_cart(&self, token: &str) -> i64 {
        let (status, body) = self.request(Method::POST, "/carts", Some(token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    pub async fn add_item(&self, token: &str, cart_id: i64, product_id: i64, quantity: i32) {
        let (status, _) = self
            .request(
                Method::POST,
                &format!("/carts/{}/items", cart_id),
                Some(token),
                Some(json!({ "product_id": product_id, "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    pub async fn place_order(&self, token: &str, cart_id: i64) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/orders",
            Some(token),
            Some(json!({ "cart_id": cart_id })),
        )
        .await
    }

    pub async fn execute_sql(&self, sql: &str) {
        self.db
            .connection()
            .execute_unprepared(sql)
            .await
            .expect("raw statement");
    }
}
