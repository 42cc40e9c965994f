//! Cart line items.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BrandId, CategoryId, ProductId};

/// Product fields captured when an item is added to the cart.
///
/// This is a line item without a quantity. The `id` accepts either a string
/// or a number on the wire; numbers are coerced to strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDescriptor {
    pub id: ProductId,
    pub name: String,
    /// Unit price at the time the item was added. Never negative.
    #[serde(with = "unit_price")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
}

/// One product entry in the cart together with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "unit_price")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// Build a line item from a descriptor.
    #[must_use]
    pub fn new(descriptor: LineItemDescriptor, quantity: NonZeroU32) -> Self {
        let LineItemDescriptor {
            id,
            name,
            price,
            image,
            category,
            brand,
            category_id,
            brand_id,
        } = descriptor;

        Self {
            id,
            name,
            price,
            image,
            category,
            brand,
            category_id,
            brand_id,
            quantity,
        }
    }

    /// `price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity.get()))
    }
}

/// Prices travel as JSON numbers and must not be negative.
mod unit_price {
    use rust_decimal::Decimal;
    use serde::{Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(price, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let price = rust_decimal::serde::float::deserialize(deserializer)?;
        if price < Decimal::ZERO {
            return Err(D::Error::custom(format!("price cannot be negative: {price}")));
        }
        Ok(price)
    }
}
