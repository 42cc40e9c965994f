//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness
//! GET    /health/ready           - Readiness (database ping)
//!
//! # Catalog
//! GET    /api/products           - Filtered listing
//! GET    /api/products/{id}      - Product detail
//! GET    /api/categories         - Categories with product counts
//! GET    /api/brands             - Brands with product counts
//!
//! # Cart (session-backed)
//! GET    /api/cart               - Current cart
//! DELETE /api/cart               - Clear cart
//! POST   /api/cart/items         - Add one unit of a product
//! PATCH  /api/cart/items/{id}    - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{id}    - Remove line
//! POST   /api/cart/open          - Show cart panel
//! POST   /api/cart/close         - Hide cart panel
//!
//! # Order requests (rate limited)
//! POST   /api/orders             - Record an order from client-supplied lines
//! POST   /api/checkout           - Record an order from the session cart
//! ```

pub mod cart;
pub mod checkout;
pub mod facets;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::order_rate_limiter;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(facets::categories))
        .route("/brands", get(facets::brands))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{id}",
            patch(cart::update_quantity).delete(cart::remove),
        )
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create the order submission router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create))
        .route("/checkout", post(checkout::submit))
        .layer(order_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", catalog_routes().merge(order_routes()))
        .nest("/api/cart", cart_routes())
}
