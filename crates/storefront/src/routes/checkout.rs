//! Checkout: turns the session cart into an order request.

use axum::{Json, extract::State};
use tracing::instrument;

use ironyard_core::cart::CartCommand;

use super::orders::{OrderCreated, record};
use crate::cart::SessionCart;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::order::{CheckoutRequest, NewOrder};
use crate::state::AppState;

/// Submit the session cart with the given customer details.
///
/// The total is the cart's own total. The cart is cleared only once the
/// order is committed, so a failed attempt can be resubmitted as is.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    mut cart: SessionCart,
    ApiJson(customer): ApiJson<CheckoutRequest>,
) -> Result<Json<OrderCreated>> {
    let items = cart.state().items().to_vec();
    let total = cart.state().total_price();
    let order = NewOrder::validate(customer, items, Some(total))?;

    let created = record(&state, &order).await?;
    cart.dispatch(CartCommand::Clear).await;
    if cart.has_unsaved_changes() {
        tracing::error!(
            order_id = %created.order.id,
            "Order recorded but the session cart was not cleared; a resubmission will duplicate it"
        );
    }

    Ok(Json(created))
}
