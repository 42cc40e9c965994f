//! Catalog seeding from YAML.
//!
//! ```yaml
//! categories:
//!   - id: cat-welding
//!     name: Welding
//! brands:
//!   - id: brand-lincoln
//!     name: Lincoln Electric
//! products:
//!   - id: mig-180
//!     name: MIG 180 Welder
//!     price: 899.00
//!     category: cat-welding
//!     brand: brand-lincoln
//!     best_seller: true
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use ironyard_core::{BrandId, CategoryId, ProductId};

use super::RepositoryError;

/// Parsed seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<FacetSeed>,
    #[serde(default)]
    pub brands: Vec<FacetSeed>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// A category or brand entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FacetSeed {
    pub id: String,
    pub name: String,
}

/// A product entry. Flags default to `false`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub brand: Option<BrandId>,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub out_of_stock: bool,
}

/// Rows written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub brands: usize,
    pub products: usize,
}

impl CatalogSeed {
    /// Parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub async fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Validate a seed before touching the database.
///
/// Returns a list of problems, empty when the seed is usable.
#[must_use]
pub fn validate(seed: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();

    let category_ids = collect_facet_ids("category", &seed.categories, &mut errors);
    let brand_ids = collect_facet_ids("brand", &seed.brands, &mut errors);

    let mut product_ids = HashSet::new();
    for product in &seed.products {
        let id = product.id.as_str();
        if id.trim().is_empty() {
            errors.push(format!("Product '{}' has an empty id", product.name));
        } else if !product_ids.insert(id) {
            errors.push(format!("Duplicate product id: {id}"));
        }
        if product.name.trim().is_empty() {
            errors.push(format!("Product {id} has an empty name"));
        }
        if product.price < Decimal::ZERO {
            errors.push(format!("Product {id} has a negative price"));
        }
        if product.original_price.is_some_and(|p| p < Decimal::ZERO) {
            errors.push(format!("Product {id} has a negative original_price"));
        }
        if product.rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
            errors.push(format!("Product {id} rating must be between 0 and 5"));
        }
        if product.review_count.is_some_and(|c| c < 0) {
            errors.push(format!("Product {id} has a negative review_count"));
        }
        if let Some(category) = &product.category
            && !category_ids.contains(category.as_str())
        {
            errors.push(format!("Product {id} references unknown category {category}"));
        }
        if let Some(brand) = &product.brand
            && !brand_ids.contains(brand.as_str())
        {
            errors.push(format!("Product {id} references unknown brand {brand}"));
        }
    }

    errors
}

fn collect_facet_ids<'a>(
    kind: &str,
    facets: &'a [FacetSeed],
    errors: &mut Vec<String>,
) -> HashSet<&'a str> {
    let mut ids = HashSet::new();
    for facet in facets {
        if facet.id.trim().is_empty() || facet.name.trim().is_empty() {
            errors.push(format!("Empty {kind} id or name: {:?}", facet.id));
        }
        if !ids.insert(facet.id.as_str()) {
            errors.push(format!("Duplicate {kind} id: {}", facet.id));
        }
    }
    ids
}

/// Upsert a validated seed in one transaction.
///
/// With `clear_existing`, products, categories and brands are deleted first.
/// Orders are never touched.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails; nothing is
/// committed in that case.
pub async fn seed_catalog(
    pool: &PgPool,
    seed: &CatalogSeed,
    clear_existing: bool,
) -> Result<SeedReport, RepositoryError> {
    let mut tx = pool.begin().await?;

    if clear_existing {
        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM categories").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM brands").execute(&mut *tx).await?;
        tracing::info!("Cleared existing catalog");
    }

    for category in &seed.categories {
        sqlx::query(
            "INSERT INTO categories (id, name) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(&category.id)
        .bind(&category.name)
        .execute(&mut *tx)
        .await?;
    }

    for brand in &seed.brands {
        sqlx::query(
            "INSERT INTO brands (id, name) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(&brand.id)
        .bind(&brand.name)
        .execute(&mut *tx)
        .await?;
    }

    for product in &seed.products {
        sqlx::query(
            r"
            INSERT INTO products (id, name, description, price, original_price, rating,
                                  review_count, image_url, is_best_seller, is_new,
                                  is_featured, is_out_of_stock, category_id, brand_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                original_price = EXCLUDED.original_price,
                rating = EXCLUDED.rating,
                review_count = EXCLUDED.review_count,
                image_url = EXCLUDED.image_url,
                is_best_seller = EXCLUDED.is_best_seller,
                is_new = EXCLUDED.is_new,
                is_featured = EXCLUDED.is_featured,
                is_out_of_stock = EXCLUDED.is_out_of_stock,
                category_id = EXCLUDED.category_id,
                brand_id = EXCLUDED.brand_id
            ",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.rating)
        .bind(product.review_count)
        .bind(&product.image_url)
        .bind(product.best_seller)
        .bind(product.new)
        .bind(product.featured)
        .bind(product.out_of_stock)
        .bind(&product.category)
        .bind(&product.brand)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(SeedReport {
        categories: seed.categories.len(),
        brands: seed.brands.len(),
        products: seed.products.len(),
    })
}
