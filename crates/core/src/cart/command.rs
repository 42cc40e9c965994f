//! Cart commands.

use super::item::LineItemDescriptor;
use crate::types::ProductId;

/// A single mutation of the cart.
///
/// Every public cart operation has a command form so that callers can route
/// all mutations through one dispatcher (see
/// [`PersistentCart::dispatch`](super::PersistentCart::dispatch)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    AddItem(LineItemDescriptor),
    RemoveItem(ProductId),
    UpdateQuantity { id: ProductId, quantity: i64 },
    Clear,
    Open,
    Close,
}

impl CartCommand {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "add_item",
            Self::RemoveItem(_) => "remove_item",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear",
            Self::Open => "open",
            Self::Close => "close",
        }
    }

    /// Product the command targets, if any.
    #[must_use]
    pub const fn product_id(&self) -> Option<&ProductId> {
        match self {
            Self::AddItem(descriptor) => Some(&descriptor.id),
            Self::RemoveItem(id) | Self::UpdateQuantity { id, .. } => Some(id),
            Self::Clear | Self::Open | Self::Close => None,
        }
    }
}
