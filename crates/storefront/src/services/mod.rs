//! Business logic services for storefront.
//!
//! - `catalog` - Catalog reads shaped into JSON payloads, with cached facet lists

pub mod catalog;

pub use catalog::CatalogService;
