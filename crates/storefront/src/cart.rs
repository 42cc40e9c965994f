//! Session-backed cart persistence.
//!
//! The browser's session (one per `iy_session` cookie) is the durable slot
//! for the cart snapshot. Each request loads the snapshot once, dispatches a
//! single command, and writes the new snapshot back to the session. Two tabs
//! sharing a cookie are not reconciled: whichever request saves last wins.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;

use ironyard_core::cart::{
    CartCommand, CartLineItem, CartState, CartStorage, PersistentCart, STORAGE_KEY,
};

use crate::error::AppError;

/// A [`CartStorage`] slot buffered in memory between session reads and writes.
///
/// The slot holds exactly one value, the snapshot under [`STORAGE_KEY`]; reads
/// and writes of any other key are ignored.
///
/// Session I/O is async while cart storage is synchronous, so the snapshot is
/// read before the cart is built and any pending write is flushed after the
/// command has run.
#[derive(Debug, Default)]
pub struct SessionSlot {
    snapshot: Option<String>,
    dirty: bool,
}

impl SessionSlot {
    /// Slot pre-filled with whatever the session held under [`STORAGE_KEY`].
    #[must_use]
    pub const fn new(snapshot: Option<String>) -> Self {
        Self {
            snapshot,
            dirty: false,
        }
    }

    /// The snapshot written since the last flush, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        if self.dirty {
            self.snapshot.as_deref()
        } else {
            None
        }
    }

    const fn mark_flushed(&mut self) {
        self.dirty = false;
    }
}

impl CartStorage for SessionSlot {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok((key == STORAGE_KEY).then(|| self.snapshot.clone()).flatten())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        if key == STORAGE_KEY {
            self.snapshot = Some(value);
            self.dirty = true;
        }
        Ok(())
    }
}

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub is_open: bool,
    pub total_items: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        Self {
            items: state.items().to_vec(),
            is_open: state.is_open(),
            total_items: state.total_items(),
            total_price: state.total_price(),
        }
    }
}

/// The current session's cart, loaded from its snapshot.
///
/// # Example
///
/// ```rust,ignore
/// async fn open(mut cart: SessionCart) -> Json<CartView> {
///     Json(cart.dispatch(CartCommand::Open).await)
/// }
/// ```
pub struct SessionCart {
    session: Session,
    cart: PersistentCart<SessionSlot>,
}

impl SessionCart {
    /// Load the cart for `session`.
    ///
    /// Unreadable session data starts an empty cart.
    pub async fn load(session: Session) -> Self {
        let snapshot = match session.get::<String>(STORAGE_KEY).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable cart session data");
                None
            }
        };
        let cart = PersistentCart::load(SessionSlot::new(snapshot));
        Self { session, cart }
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        self.cart.state()
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from(self.cart.state())
    }

    /// Whether the last command's snapshot is still waiting to reach the
    /// session.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.cart.storage().pending().is_some()
    }

    /// Apply one command and save the snapshot to the session.
    ///
    /// Save failures are logged; the returned view always reflects the new
    /// state.
    pub async fn dispatch(&mut self, command: CartCommand) -> CartView {
        let name = command.name();
        let product_id = command.product_id().map(|id| id.as_str().to_owned());
        if let Err(err) = self.cart.dispatch(command) {
            tracing::warn!(command = name, error = %err, "Cart snapshot not saved");
        }
        self.flush().await;
        tracing::debug!(
            command = name,
            product_id = product_id.as_deref(),
            total_items = self.cart.total_items(),
            "Cart updated"
        );
        self.view()
    }

    async fn flush(&mut self) {
        let Some(snapshot) = self.cart.storage().pending().map(str::to_owned) else {
            return;
        };
        match self.session.insert(STORAGE_KEY, snapshot).await {
            Ok(()) => self.cart.storage_mut().mark_flushed(),
            Err(err) => {
                tracing::warn!(error = %err, "Cart snapshot not written to session");
            }
        }
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;
        Ok(Self::load(session).await)
    }
}
