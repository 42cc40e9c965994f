//! Snapshot encoding for persisted carts.
//!
//! A snapshot is the JSON form of the whole [`CartState`]:
//!
//! ```json
//! {"items":{"p1":{"id":"p1","name":"Gate Valve","price":42.5,"image":"","category":"Plumbing","quantity":2}},"isOpen":false}
//! ```
//!
//! There is no version field. Absent top-level fields default; anything else
//! that does not decode is discarded by [`CartState::from_snapshot`].

use thiserror::Error;

use super::state::CartState;

/// Fixed storage key the snapshot lives under.
pub const STORAGE_KEY: &str = "cart-storage";

/// Snapshot could not be encoded or decoded.
#[derive(Debug, Error)]
#[error("cart snapshot error: {0}")]
pub struct SnapshotError(#[from] serde_json::Error);

/// Serialize a cart to its snapshot string.
///
/// # Errors
///
/// Returns `SnapshotError` if JSON serialization fails.
pub fn encode(state: &CartState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a snapshot string.
///
/// # Errors
///
/// Returns `SnapshotError` for invalid JSON or any snapshot that breaks a
/// cart invariant (zero quantity, negative price, mismatched or repeated ids).
pub fn decode(raw: &str) -> Result<CartState, SnapshotError> {
    Ok(serde_json::from_str(raw)?)
}

impl CartState {
    /// Restore a cart from an optional snapshot.
    ///
    /// Missing or malformed snapshots yield an empty, closed cart.
    #[must_use]
    pub fn from_snapshot(raw: Option<&str>) -> Self {
        raw.and_then(|raw| decode(raw).ok()).unwrap_or_default()
    }
}
