//! Session middleware configuration.
//!
//! Sessions hold the cart snapshot, so their lifetime is the cart's lifetime:
//! 30 days after the last request that touched the cart. Production uses
//! `tower_sessions_sqlx_store::PostgresStore`, whose `tower_sessions.session`
//! table is created by migration.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "iy_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Apply the storefront cookie settings to any session store.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(
    store: S,
    config: &StorefrontConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
