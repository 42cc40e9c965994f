//! Catalog rows and the JSON payloads built from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use ironyard_core::{BadgeFlags, BrandId, CategoryId, ProductBadge, ProductId};

use super::image::{DETAIL_PLACEHOLDER, ImageResolver, LISTING_PLACEHOLDER};

/// Lower bound applied when `minPrice` is absent.
pub const DEFAULT_MIN_PRICE: Decimal = Decimal::ZERO;

/// Upper bound applied when `maxPrice` is absent.
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

const DEFAULT_CATEGORY: &str = "Uncategorized";
const DEFAULT_BRAND: &str = "Unknown Brand";
const DEFAULT_RATING: f64 = 4.9;
const IN_STOCK_COUNT: u32 = 10;
const WARRANTY: &str = "1 Year Manufacturer Warranty";
const SHIPPING: &str = "Free shipping on orders over $50";

// =============================================================================
// Rows
// =============================================================================

/// A product joined with its category and brand names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub image_url: Option<String>,
    pub is_best_seller: bool,
    pub is_new: bool,
    pub is_featured: bool,
    pub is_out_of_stock: bool,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub brand_id: Option<BrandId>,
    pub brand_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    #[must_use]
    pub const fn badge(&self) -> Option<ProductBadge> {
        ProductBadge::from_flags(BadgeFlags {
            best_seller: self.is_best_seller,
            new: self.is_new,
            featured: self.is_featured,
            out_of_stock: self.is_out_of_stock,
        })
    }

    fn category_label(&self) -> String {
        self.category_name
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    fn brand_label(&self) -> String {
        self.brand_name
            .clone()
            .unwrap_or_else(|| DEFAULT_BRAND.to_string())
    }
}

/// A category with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub product_count: i64,
}

/// A brand with the number of products it makes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BrandSummary {
    pub id: BrandId,
    pub name: String,
    pub product_count: i64,
}

// =============================================================================
// Payloads
// =============================================================================

/// Product as it appears in the listing grid.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: Option<CategoryId>,
    pub category: String,
    #[serde(rename = "brandId")]
    pub brand_id: Option<BrandId>,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "originalPrice", with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub rating: f64,
    pub review_count: i32,
    pub image_url: String,
    pub badge: Option<ProductBadge>,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
}

impl ProductSummary {
    #[must_use]
    pub fn from_record(record: ProductRecord, images: &ImageResolver) -> Self {
        let badge = record.badge();
        let category = record.category_label();
        let brand = record.brand_label();
        let image_url = images.resolve(record.image_url.as_deref(), LISTING_PLACEHOLDER);

        Self {
            id: record.id,
            name: record.name,
            description: record.description.unwrap_or_default(),
            category_id: record.category_id,
            category,
            brand_id: record.brand_id,
            brand,
            price: record.price,
            original_price: record.original_price,
            rating: record.rating.unwrap_or(DEFAULT_RATING),
            review_count: record.review_count.unwrap_or(0),
            image_url,
            badge,
            in_stock: !record.is_out_of_stock,
        }
    }
}

/// Product as it appears on its own page.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "originalPrice", with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub rating: f64,
    pub review_count: i32,
    /// Gallery; currently always the single primary image.
    pub image_url: Vec<String>,
    pub badge: Option<ProductBadge>,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    #[serde(rename = "stockCount")]
    pub stock_count: u32,
    pub specifications: serde_json::Map<String, serde_json::Value>,
    pub features: Vec<String>,
    pub warranty: &'static str,
    pub shipping: &'static str,
}

impl ProductDetail {
    #[must_use]
    pub fn from_record(record: ProductRecord, images: &ImageResolver) -> Self {
        let badge = record.badge();
        let category = record.category_label();
        let brand = record.brand_label();
        let image = images.resolve(record.image_url.as_deref(), DETAIL_PLACEHOLDER);
        let in_stock = !record.is_out_of_stock;

        Self {
            id: record.id,
            name: record.name,
            description: record.description.unwrap_or_default(),
            category,
            brand,
            price: record.price,
            original_price: record.original_price,
            rating: record.rating.unwrap_or(DEFAULT_RATING),
            review_count: record.review_count.unwrap_or(0),
            image_url: vec![image],
            badge,
            in_stock,
            stock_count: if in_stock { IN_STOCK_COUNT } else { 0 },
            specifications: serde_json::Map::new(),
            features: Vec::new(),
            warranty: WARRANTY,
            shipping: SHIPPING,
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Invalid listing query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{param} must be a number, got {value:?}")]
    InvalidPrice { param: &'static str, value: String },
}

/// Listing filters parsed from the query string.
///
/// A product matches when its price lies in `min_price..=max_price` and, if
/// any category or brand is given, it matches at least one of them. Each
/// value matches either a name (case-insensitive) or an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            brands: Vec::new(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl ProductFilter {
    /// Parse a raw query string.
    ///
    /// Accepts `categories[]=a&categories[]=b` as well as `categories=a`.
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidPrice` if `minPrice` or `maxPrice` is not
    /// a decimal number.
    pub fn from_query(raw: Option<&str>) -> Result<Self, FilterError> {
        let mut filter = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "categories[]" | "categories" => filter.categories.push(value.to_string()),
                "brands[]" | "brands" => filter.brands.push(value.to_string()),
                "minPrice" => filter.min_price = parse_price("minPrice", value)?,
                "maxPrice" => filter.max_price = parse_price("maxPrice", value)?,
                _ => {}
            }
        }

        Ok(filter)
    }

    /// Whether any category or brand restriction applies.
    #[must_use]
    pub fn has_facets(&self) -> bool {
        !self.categories.is_empty() || !self.brands.is_empty()
    }
}

fn parse_price(param: &'static str, value: &str) -> Result<Decimal, FilterError> {
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| FilterError::InvalidPrice {
            param,
            value: value.to_string(),
        })
}
