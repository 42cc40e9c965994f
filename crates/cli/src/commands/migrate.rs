//! Database migration commands.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded at
//! compile time.

use super::{CommandError, connect};

/// Errors from running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
