//! Cart state container.
//!
//! - [`CartState`] - line items keyed by product id plus the panel
//!   visibility flag, with add/remove/update/clear and derived totals
//! - [`CartCommand`] - the same operations as values
//! - [`snapshot`] - JSON snapshot format under [`STORAGE_KEY`]
//! - [`PersistentCart`] - applies commands and saves after each one through
//!   a [`CartStorage`] slot
//!
//! ```
//! use ironyard_core::ProductId;
//! use ironyard_core::cart::{LineItemDescriptor, MemoryStorage, PersistentCart};
//!
//! let mut cart = PersistentCart::load(MemoryStorage::new());
//! let hoist = LineItemDescriptor {
//!     id: ProductId::from("hoist-1t"),
//!     name: "1 Ton Chain Hoist".to_string(),
//!     price: 100.into(),
//!     image: String::new(),
//!     category: "Lifting".to_string(),
//!     brand: None,
//!     category_id: None,
//!     brand_id: None,
//! };
//! cart.add_item(hoist.clone()).unwrap();
//! cart.add_item(hoist).unwrap();
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price(), 200.into());
//! ```

mod command;
mod item;
pub mod snapshot;
mod state;
mod storage;

pub use command::CartCommand;
pub use item::{CartLineItem, LineItemDescriptor};
pub use snapshot::{STORAGE_KEY, SnapshotError};
pub use state::CartState;
pub use storage::{CartStorage, MemoryStorage, PersistError, PersistentCart};
