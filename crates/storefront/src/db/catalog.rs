//! Catalog repository: products, categories and brands.

use sqlx::PgPool;

use ironyard_core::ProductId;

use super::RepositoryError;
use crate::models::catalog::{BrandSummary, CategorySummary, ProductFilter, ProductRecord};

const PRODUCT_SELECT: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.original_price,
           p.rating, p.review_count, p.image_url,
           p.is_best_seller, p.is_new, p.is_featured, p.is_out_of_stock,
           p.category_id, c.name AS category_name,
           p.brand_id, b.name AS brand_name,
           p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN brands b ON b.id = p.brand_id
";

/// `$1`/`$2` price bounds, `$3`/`$4` category names (lowercased) and ids,
/// `$5`/`$6` brand names (lowercased) and ids. Empty facet arrays mean no
/// facet restriction.
const PRODUCT_FILTER: &str = r"
    WHERE p.price >= $1
      AND p.price <= $2
      AND (
            (cardinality($3::text[]) = 0 AND cardinality($5::text[]) = 0)
            OR lower(c.name) = ANY($3) OR p.category_id = ANY($4)
            OR lower(b.name) = ANY($5) OR p.brand_id = ANY($6)
          )
    ORDER BY p.created_at DESC
";

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching `filter`, newest first.
    ///
    /// Category and brand restrictions are OR'ed together: a product matches
    /// any listed category or any listed brand, by case-insensitive name or
    /// by id. The price range always applies.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductRecord>, RepositoryError> {
        let sql = format!("{PRODUCT_SELECT} {PRODUCT_FILTER}");
        let rows = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(lowercased(&filter.categories))
            .bind(&filter.categories)
            .bind(lowercased(&filter.brands))
            .bind(&filter.brands)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductRecord>, RepositoryError> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// All categories with their product counts, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategorySummary>(
            r"
            SELECT c.id, c.name, COUNT(p.id) AS product_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// All brands with their product counts, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_brands(&self) -> Result<Vec<BrandSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, BrandSummary>(
            r"
            SELECT b.id, b.name, COUNT(p.id) AS product_count
            FROM brands b
            LEFT JOIN products p ON p.brand_id = b.id
            GROUP BY b.id, b.name
            ORDER BY b.name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

fn lowercased(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercased_facets() {
        let values = vec!["Welding".to_string(), "brand-MILLER".to_string()];
        assert_eq!(lowercased(&values), vec!["welding", "brand-miller"]);
        assert!(lowercased(&[]).is_empty());
    }

    #[test]
    fn test_filter_binds_every_parameter() {
        for n in 1..=6 {
            assert!(PRODUCT_FILTER.contains(&format!("${n}")), "missing ${n}");
        }
        assert!(!PRODUCT_FILTER.contains("$7"));
    }
}
