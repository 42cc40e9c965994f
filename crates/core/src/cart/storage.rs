//! Durable storage for cart snapshots and the save-after-command wrapper.

use std::collections::HashMap;
use std::convert::Infallible;

use rust_decimal::Decimal;
use thiserror::Error;

use super::command::CartCommand;
use super::item::LineItemDescriptor;
use super::snapshot::{self, STORAGE_KEY, SnapshotError};
use super::state::CartState;
use crate::types::ProductId;

/// A key-value slot that holds serialized carts.
pub trait CartStorage {
    /// Error raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns the backing store's error if the read fails.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns the backing store's error if the write fails.
    fn write(&mut self, key: &str, value: String) -> Result<(), Self::Error>;
}

/// In-process storage, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        self.slots.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Failure to persist a cart after a command.
///
/// The command itself has already been applied to the in-memory state when
/// this is returned.
#[derive(Debug, Error)]
pub enum PersistError<E> {
    #[error(transparent)]
    Encode(#[from] SnapshotError),

    #[error("cart storage write failed: {0}")]
    Storage(#[source] E),
}

/// A cart bound to a storage slot.
///
/// The snapshot is read once in [`load`](Self::load). Every command goes
/// through [`dispatch`](Self::dispatch), which applies it to the state and
/// then writes the full snapshot back under [`STORAGE_KEY`].
#[derive(Debug)]
pub struct PersistentCart<S> {
    state: CartState,
    storage: S,
}

impl<S: CartStorage> PersistentCart<S> {
    /// Initialize from whatever snapshot the slot holds.
    ///
    /// A failed read, a missing snapshot and a malformed snapshot all start
    /// from an empty cart.
    pub fn load(storage: S) -> Self {
        let raw = storage.read(STORAGE_KEY).ok().flatten();
        let state = CartState::from_snapshot(raw.as_deref());
        Self { state, storage }
    }

    /// Apply a command and persist the resulting state.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the snapshot could not be written. The state
    /// transition is kept either way.
    pub fn dispatch(&mut self, command: CartCommand) -> Result<&CartState, PersistError<S::Error>> {
        self.state.apply(command);
        self.save()?;
        Ok(&self.state)
    }

    /// Add one unit of a product and persist.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn add_item(
        &mut self,
        candidate: LineItemDescriptor,
    ) -> Result<&CartState, PersistError<S::Error>> {
        self.dispatch(CartCommand::AddItem(candidate))
    }

    /// Remove a product's line and persist.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn remove_item(&mut self, id: ProductId) -> Result<&CartState, PersistError<S::Error>> {
        self.dispatch(CartCommand::RemoveItem(id))
    }

    /// Set a line's quantity (removing it at zero or below) and persist.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn update_quantity(
        &mut self,
        id: ProductId,
        quantity: i64,
    ) -> Result<&CartState, PersistError<S::Error>> {
        self.dispatch(CartCommand::UpdateQuantity { id, quantity })
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn clear_cart(&mut self) -> Result<&CartState, PersistError<S::Error>> {
        self.dispatch(CartCommand::Clear)
    }

    /// Show the cart panel and persist.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn open_cart(&mut self) -> Result<&CartState, PersistError<S::Error>> {
        self.dispatch(CartCommand::Open)
    }

    /// Hide the cart panel and persist.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub fn close_cart(&mut self) -> Result<&CartState, PersistError<S::Error>> {
        self.dispatch(CartCommand::Close)
    }

    fn save(&mut self) -> Result<(), PersistError<S::Error>> {
        let raw = snapshot::encode(&self.state)?;
        self.storage
            .write(STORAGE_KEY, raw)
            .map_err(PersistError::Storage)
    }
}

impl<S> PersistentCart<S> {
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.state.total_price()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the slot, e.g. to acknowledge a flushed write.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Split into state and storage.
    #[must_use]
    pub fn into_parts(self) -> (CartState, S) {
        (self.state, self.storage)
    }
}
