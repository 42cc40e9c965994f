//! Catalog service: repository reads shaped into payloads.
//!
//! Category and brand lists are cached with `moka`. Product queries are not
//! cached since the filters vary per request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use ironyard_core::ProductId;

use crate::db::{CatalogRepository, RepositoryError};
use crate::models::catalog::{
    BrandSummary, CategorySummary, ProductDetail, ProductFilter, ProductSummary,
};
use crate::models::image::ImageResolver;

/// Cache key for facet lists.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Categories,
    Brands,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Categories(Arc<Vec<CategorySummary>>),
    Brands(Arc<Vec<BrandSummary>>),
}

/// Catalog access for route handlers.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    pool: PgPool,
    images: ImageResolver,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    /// Create a catalog service whose facet lists live for `ttl`.
    #[must_use]
    pub fn new(pool: PgPool, images: ImageResolver, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();

        Self {
            inner: Arc::new(CatalogServiceInner {
                pool,
                images,
                cache,
            }),
        }
    }

    fn repository(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(&self.inner.pool)
    }

    /// Products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let records = self.repository().list_products(filter).await?;
        debug!(count = records.len(), faceted = filter.has_facets(), "Listed products");
        Ok(records
            .into_iter()
            .map(|record| ProductSummary::from_record(record, &self.inner.images))
            .collect())
    }

    /// A single product, or `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let record = self.repository().get_product(id).await?;
        Ok(record.map(|record| ProductDetail::from_record(record, &self.inner.images)))
    }

    /// Categories with product counts, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list is not cached and the query fails.
    pub async fn categories(&self) -> Result<Arc<Vec<CategorySummary>>, RepositoryError> {
        if let Some(CacheValue::Categories(list)) = self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(list);
        }

        let list = Arc::new(self.repository().list_categories().await?);
        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(Arc::clone(&list)))
            .await;
        Ok(list)
    }

    /// Brands with product counts, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list is not cached and the query fails.
    pub async fn brands(&self) -> Result<Arc<Vec<BrandSummary>>, RepositoryError> {
        if let Some(CacheValue::Brands(list)) = self.inner.cache.get(&CacheKey::Brands).await {
            debug!("Cache hit for brands");
            return Ok(list);
        }

        let list = Arc::new(self.repository().list_brands().await?);
        self.inner
            .cache
            .insert(CacheKey::Brands, CacheValue::Brands(Arc::clone(&list)))
            .await;
        Ok(list)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ironyard_core::CategoryId;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    /// A pool that never connects; any query against it fails.
    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(50))
            .connect_lazy("postgres://ironyard@127.0.0.1:1/ironyard")
            .unwrap()
    }

    #[tokio::test]
    async fn test_cached_categories_skip_database() {
        let service = CatalogService::new(
            unreachable_pool(),
            ImageResolver::default(),
            Duration::from_secs(60),
        );
        let cached = Arc::new(vec![CategorySummary {
            id: CategoryId::from("cat-welding"),
            name: "Welding".to_string(),
            product_count: 3,
        }]);
        service
            .inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(Arc::clone(&cached)))
            .await;

        let list = service.categories().await.unwrap();
        assert_eq!(list, cached);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let service = CatalogService::new(
            unreachable_pool(),
            ImageResolver::default(),
            Duration::from_secs(60),
        );
        for _ in 0..2 {
            assert!(matches!(
                service.brands().await,
                Err(RepositoryError::Database(_))
            ));
        }
        assert!(service.inner.cache.get(&CacheKey::Brands).await.is_none());
    }
}
