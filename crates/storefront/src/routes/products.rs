//! Product route handlers.

use axum::{
    Json,
    extract::{RawQuery, State},
};
use tracing::instrument;

use ironyard_core::ProductId;

use crate::error::{AppError, Result};
use crate::extract::ApiPath;
use crate::models::catalog::{ProductDetail, ProductFilter, ProductSummary};
use crate::state::AppState;

/// Product listing.
///
/// The query string is parsed by hand since `categories[]` repeats.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ProductSummary>>> {
    let filter = ProductFilter::from_query(query.as_deref())?;
    let products = state.catalog().list_products(&filter).await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ProductDetail>> {
    let id = ProductId::from(id);
    state
        .catalog()
        .get_product(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
