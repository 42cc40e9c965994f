//! Cart lifecycle across requests, carried by the session cookie.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use ironyard_core::cart::CartLineItem;
use ironyard_integration_tests::{TestApp, descriptor};

#[tokio::test]
async fn test_new_session_has_empty_closed_cart() {
    let mut app = TestApp::new();
    let resp = app.get("/api/cart").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({"items": [], "isOpen": false, "totalItems": 0, "totalPrice": 0.0})
    );
}

#[tokio::test]
async fn test_add_twice_then_add_other_and_update() {
    let mut app = TestApp::new();

    app.post("/api/cart/items", descriptor("A", 100.0)).await;
    let resp = app.post("/api/cart/items", descriptor("A", 100.0)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(app.cookie().unwrap().starts_with("iy_session="));
    assert_eq!(resp.body["totalItems"], 2);
    assert_eq!(resp.body["totalPrice"], 200.0);
    assert_eq!(resp.body["items"].as_array().unwrap().len(), 1);

    app.post("/api/cart/items", descriptor("B", 50.0)).await;
    let resp = app
        .send(
            Method::PATCH,
            "/api/cart/items/B",
            Some(json!({"quantity": 3})),
        )
        .await;
    assert_eq!(resp.body["totalItems"], 5);
    assert_eq!(resp.body["totalPrice"], 350.0);

    let resp = app.send(Method::DELETE, "/api/cart/items/A", None).await;
    assert_eq!(resp.body["totalItems"], 3);
    assert_eq!(resp.body["totalPrice"], 150.0);
    assert_eq!(resp.body["items"][0]["id"], "B");
    assert_eq!(resp.body["items"][0]["quantity"], 3);
}

#[tokio::test]
async fn test_cart_survives_between_requests() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", descriptor("hoist-1t", 249.99))
        .await;
    app.post("/api/cart/open", json!({})).await;

    let resp = app.get("/api/cart").await;
    assert_eq!(resp.body["isOpen"], true);

    let items: Vec<CartLineItem> = serde_json::from_value(resp.body["items"].clone()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "hoist-1t");
    assert_eq!(items[0].name, "Product hoist-1t");
    assert_eq!(items[0].image, "/images/hoist-1t.jpg");
    assert_eq!(items[0].quantity.get(), 1);
    assert_eq!(items[0].line_total(), "249.99".parse().unwrap());
}

#[tokio::test]
async fn test_other_browser_sees_its_own_cart() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", descriptor("A", 10.0)).await;

    app.clear_cookie();
    let resp = app.get("/api/cart").await;
    assert_eq!(resp.body["totalItems"], 0);
}

#[tokio::test]
async fn test_zero_or_negative_quantity_removes_line() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", descriptor("A", 10.0)).await;
    app.post("/api/cart/items", descriptor("B", 20.0)).await;

    let resp = app
        .send(Method::PATCH, "/api/cart/items/A", Some(json!({"quantity": 0})))
        .await;
    assert_eq!(resp.body["items"].as_array().unwrap().len(), 1);

    let resp = app
        .send(Method::PATCH, "/api/cart/items/B", Some(json!({"quantity": -1})))
        .await;
    assert_eq!(resp.body["items"], json!([]));
}

#[tokio::test]
async fn test_unknown_ids_are_no_ops() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", descriptor("A", 10.0)).await;

    let before = app.get("/api/cart").await.body;
    app.send(Method::DELETE, "/api/cart/items/missing", None).await;
    app.send(
        Method::PATCH,
        "/api/cart/items/missing",
        Some(json!({"quantity": 4})),
    )
    .await;
    assert_eq!(app.get("/api/cart").await.body, before);
}

#[tokio::test]
async fn test_clear_keeps_panel_open() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", descriptor("A", 10.0)).await;
    app.post("/api/cart/open", json!({})).await;

    let resp = app.send(Method::DELETE, "/api/cart", None).await;
    assert_eq!(resp.body["items"], json!([]));
    assert_eq!(resp.body["isOpen"], true);

    let resp = app.post("/api/cart/close", json!({})).await;
    assert_eq!(resp.body["isOpen"], false);
}

#[tokio::test]
async fn test_adding_does_not_open_panel() {
    let mut app = TestApp::new();
    let resp = app.post("/api/cart/items", descriptor("A", 10.0)).await;
    assert_eq!(resp.body["isOpen"], false);
}

#[tokio::test]
async fn test_second_add_keeps_first_descriptor() {
    let mut app = TestApp::new();
    app.post("/api/cart/items", descriptor("A", 10.0)).await;

    let mut changed = descriptor("A", 99.0);
    changed["name"] = json!("Renamed");
    let resp = app.post("/api/cart/items", changed).await;

    assert_eq!(resp.body["items"][0]["name"], "Product A");
    assert_eq!(resp.body["items"][0]["price"], 10.0);
    assert_eq!(resp.body["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_numeric_ids_are_coerced() {
    let mut app = TestApp::new();
    let mut numeric = descriptor("ignored", 5.0);
    numeric["id"] = json!(42);

    let resp = app.post("/api/cart/items", numeric).await;
    assert_eq!(resp.body["items"][0]["id"], "42");

    let resp = app
        .send(Method::PATCH, "/api/cart/items/42", Some(json!({"quantity": 2})))
        .await;
    assert_eq!(resp.body["totalItems"], 2);
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let mut app = TestApp::new();
    let resp = app.post("/api/cart/items", descriptor("A", -5.0)).await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = resp.body["error"].as_str().unwrap_or_default();
    assert!(message.contains("negative"), "unexpected body: {}", resp.body);

    let resp = app.get("/api/cart").await;
    assert_eq!(resp.body["totalItems"], 0);
}
