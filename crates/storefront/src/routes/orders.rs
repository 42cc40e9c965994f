//! Order request handler for client-supplied carts.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::order::{NewOrder, Order, OrderRequest};
use crate::state::AppState;

/// Success body for order submissions.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub success: bool,
    pub order: Order,
}

/// Validate and insert `order`.
pub(crate) async fn record(state: &AppState, order: &NewOrder) -> Result<OrderCreated> {
    let order = OrderRepository::new(state.pool())
        .create(order)
        .await
        .map_err(AppError::OrderFailed)?;
    Ok(OrderCreated {
        success: true,
        order,
    })
}

/// Record an order request.
///
/// Lines are taken from the body as sent; nothing is re-priced.
#[instrument(skip(state, request), fields(lines = request.items.len()))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OrderRequest>,
) -> Result<Json<OrderCreated>> {
    let order = NewOrder::try_from(request)?;
    Ok(Json(record(&state, &order).await?))
}
