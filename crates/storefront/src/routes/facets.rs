//! Category and brand lists.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::models::catalog::{BrandSummary, CategorySummary};
use crate::state::AppState;

/// Categories with product counts.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategorySummary>>> {
    let list = state.catalog().categories().await?;
    Ok(Json(list.as_ref().clone()))
}

/// Brands with product counts.
pub async fn brands(State(state): State<AppState>) -> Result<Json<Vec<BrandSummary>>> {
    let list = state.catalog().brands().await?;
    Ok(Json(list.as_ref().clone()))
}
