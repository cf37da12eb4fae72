//! HTTP surface tests: routing, status codes and the auth boundary.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_checkout_end_to_end() {
    let app = TestApp::spawn().await;

    let (status, user) = app
        .request(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({ "email": "e@x.com", "password": "p" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "e@x.com");
    assert!(user.get("password_hash").is_none());

    let (status, login) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "e@x.com", "password": "p" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token_type"], "Bearer");
    let token = login["token"].as_str().unwrap().to_string();

    assert_eq!(app.create_product("Widget", 5.00).await, 1);
    assert_eq!(app.create_cart(&token).await, 1);
    app.add_item(&token, 1, 1, 2).await;

    let (status, order) = app.place_order(&token, 1).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_amount"].as_f64(), Some(10.0));
    assert_eq!(order["status"], "pending");
    let order_id = order["id"].as_i64().unwrap();

    let (status, details) = app
        .request(Method::GET, &format!("/orders/{}", order_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = details["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["unit_price"].as_f64(), Some(5.0));
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["product_name"], "Widget");

    let (status, orders) = app.request(Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::spawn().await;

    for (method, uri) in [
        (Method::POST, "/carts"),
        (Method::GET, "/carts/1"),
        (Method::POST, "/carts/1/items"),
        (Method::DELETE, "/carts/1/items/1"),
        (Method::POST, "/orders"),
        (Method::GET, "/orders"),
        (Method::GET, "/orders/1"),
    ] {
        let (status, body) = app.request(method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert!(body["error"].is_string());
    }

    let (status, _) = app
        .request(Method::POST, "/carts", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_token_creates_nothing() {
    let app = TestApp::spawn().await;
    let token = app.login_as("e@x.com").await;

    let (status, _) = app.request(Method::POST, "/carts", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The first cart created with a valid token still gets id 1
    assert_eq!(app.create_cart(&token).await, 1);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = TestApp::spawn().await;
    app.login_as("e@x.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({ "email": "e@x.com", "password": "other" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.login_as("e@x.com").await;

    let (wrong_status, wrong_body) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "e@x.com", "password": "nope" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "nobody@x.com", "password": "p" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_malformed_signup_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({ "email": "not-an-email", "password": "p" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(Method::POST, "/users/signup", None, Some(json!({ "email": "e@x.com" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_crud() {
    let app = TestApp::spawn().await;
    let id = app.create_product("Widget", 5.00).await;

    let (status, product) = app
        .request(Method::GET, &format!("/products/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "Widget");
    assert_eq!(product["price"].as_f64(), Some(5.0));

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/products/{}", id),
            None,
            Some(json!({ "name": "Gadget", "description": "Shiny", "price": 7.25 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app.request(Method::GET, "/products", None, None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Gadget");
    assert_eq!(listed[0]["description"], "Shiny");
    assert_eq!(listed[0]["price"].as_f64(), Some(7.25));

    let (status, _) = app
        .request(Method::DELETE, &format!("/products/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(Method::GET, &format!("/products/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_products_listed_by_id() {
    let app = TestApp::spawn().await;
    app.create_product("B", 2.00).await;
    app.create_product("A", 1.00).await;

    let (_, listed) = app.request(Method::GET, "/products", None, None).await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_invalid_product_input() {
    let app = TestApp::spawn().await;

    for body in [
        json!({ "name": "Widget", "price": -1.0 }),
        json!({ "name": "Widget", "price": 1.005 }),
        json!({ "name": "", "price": 1.0 }),
        json!({ "name": "Widget" }),
    ] {
        let (status, _) = app.request(Method::POST, "/products", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app.request(Method::GET, "/products/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_ids_restart_on_empty_catalog() {
    let app = TestApp::spawn().await;
    app.create_product("A", 1.00).await;
    assert_eq!(app.create_product("B", 1.00).await, 2);

    app.request(Method::DELETE, "/products/1", None, None).await;
    app.request(Method::DELETE, "/products/2", None, None).await;

    assert_eq!(app.create_product("C", 1.00).await, 1);
}

#[tokio::test]
async fn test_healthz() {
    let app = TestApp::spawn().await;

    let (status, body) = app.raw_request(Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = TestApp::spawn().await;

    let (status, doc) = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "Storefront API");
}
