//! Merchandising badge shown on product cards.

use serde::{Deserialize, Serialize};

/// Badge derived from a product's merchandising flags.
///
/// Serialized with its display label ("Best Seller", "New", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductBadge {
    #[serde(rename = "Best Seller")]
    BestSeller,
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Featured")]
    Featured,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

/// Merchandising flags stored on a product row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeFlags {
    pub best_seller: bool,
    pub new: bool,
    pub featured: bool,
    pub out_of_stock: bool,
}

impl ProductBadge {
    /// Pick the badge for a product. Flags are checked in priority order:
    /// best seller, new, featured, out of stock.
    #[must_use]
    pub const fn from_flags(flags: BadgeFlags) -> Option<Self> {
        if flags.best_seller {
            Some(Self::BestSeller)
        } else if flags.new {
            Some(Self::New)
        } else if flags.featured {
            Some(Self::Featured)
        } else if flags.out_of_stock {
            Some(Self::OutOfStock)
        } else {
            None
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BestSeller => "Best Seller",
            Self::New => "New",
            Self::Featured => "Featured",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl std::fmt::Display for ProductBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
