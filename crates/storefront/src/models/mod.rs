//! Domain models for storefront.
//!
//! - [`catalog`] - Product rows, listing/detail payloads and query filters
//! - [`image`] - Product image URL resolution
//! - [`order`] - Order requests, validation and recorded orders

pub mod catalog;
pub mod image;
pub mod order;

pub use catalog::{
    BrandSummary, CategorySummary, FilterError, ProductDetail, ProductFilter, ProductRecord,
    ProductSummary,
};
pub use image::ImageResolver;
pub use order::{
    CheckoutRequest, CustomerDetails, NewOrder, Order, OrderItem, OrderRequest,
    OrderValidationError,
};
