//! Cart route handlers.
//!
//! Each handler carries exactly one cart command for the caller's session and
//! answers with the resulting cart.

use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use ironyard_core::ProductId;
use ironyard_core::cart::{CartCommand, LineItemDescriptor};

use crate::cart::{CartView, SessionCart};
use crate::error::add_breadcrumb;
use crate::extract::{ApiJson, ApiPath};

/// `PATCH /api/cart/items/{id}` body.
#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

/// Current cart.
pub async fn show(cart: SessionCart) -> Json<CartView> {
    Json(cart.view())
}

/// Add one unit of a product.
///
/// The descriptor is stored as sent; an existing line only gains a unit.
#[instrument(skip_all, fields(product_id = %descriptor.id))]
pub async fn add(
    mut cart: SessionCart,
    ApiJson(descriptor): ApiJson<LineItemDescriptor>,
) -> Json<CartView> {
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", descriptor.id.as_str())]),
    );
    Json(cart.dispatch(CartCommand::AddItem(descriptor)).await)
}

/// Set a line's quantity; zero or below removes it.
#[instrument(skip(cart))]
pub async fn update_quantity(
    mut cart: SessionCart,
    ApiPath(id): ApiPath<String>,
    ApiJson(update): ApiJson<QuantityUpdate>,
) -> Json<CartView> {
    Json(
        cart.dispatch(CartCommand::UpdateQuantity {
            id: ProductId::from(id),
            quantity: update.quantity,
        })
        .await,
    )
}

/// Remove a line.
#[instrument(skip(cart))]
pub async fn remove(mut cart: SessionCart, ApiPath(id): ApiPath<String>) -> Json<CartView> {
    Json(cart.dispatch(CartCommand::RemoveItem(ProductId::from(id))).await)
}

/// Empty the cart. The panel flag is left alone.
pub async fn clear(mut cart: SessionCart) -> Json<CartView> {
    Json(cart.dispatch(CartCommand::Clear).await)
}

/// Show the cart panel.
pub async fn open(mut cart: SessionCart) -> Json<CartView> {
    Json(cart.dispatch(CartCommand::Open).await)
}

/// Hide the cart panel.
pub async fn close(mut cart: SessionCart) -> Json<CartView> {
    Json(cart.dispatch(CartCommand::Close).await)
}
