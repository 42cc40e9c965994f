//! Subcommand implementations.

pub mod migrate;
pub mod orders;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

/// Errors shared by commands that talk to the database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read the database URL, loading `.env` first.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("IRONYARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("IRONYARD_DATABASE_URL"))
}

/// Connect to the storefront database.
async fn connect() -> Result<PgPool, CommandError> {
    let database_url = database_url()?;
    tracing::info!("Connecting to storefront database...");
    Ok(ironyard_storefront::db::create_pool(&database_url).await?)
}
