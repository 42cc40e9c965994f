//! Core types for the Ironyard storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod badge;
pub mod email;
pub mod id;

pub use badge::{BadgeFlags, ProductBadge};
pub use email::{Email, EmailError};
pub use id::{BrandId, CategoryId, OrderId, ProductId};
