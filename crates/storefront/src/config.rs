//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `IRONYARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `IRONYARD_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `IRONYARD_HOST` - Bind address (default: 127.0.0.1)
//! - `IRONYARD_PORT` - Listen port (default: 3000)
//! - `IRONYARD_IMAGE_BASE_URL` - Prefix for product image paths stored without a host
//! - `IRONYARD_CATALOG_CACHE_TTL_SECS` - Category/brand list cache TTL (default: 60)
//! - `IRONYARD_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Base URL that relative product image paths are joined onto
    pub image_base_url: Option<Url>,
    /// How long category and brand lists stay cached
    pub catalog_cache_ttl: Duration,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("IRONYARD_DATABASE_URL")?;
        let host = parse_env_or_default::<IpAddr>("IRONYARD_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("IRONYARD_PORT", "3000")?;
        let base_url = get_required_env("IRONYARD_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("IRONYARD_BASE_URL".to_string(), e.to_string())
        })?;

        let image_base_url = get_optional_env("IRONYARD_IMAGE_BASE_URL")
            .map(|raw| parse_image_base_url(&raw))
            .transpose()?;
        let catalog_cache_ttl = Duration::from_secs(parse_env_or_default::<u64>(
            "IRONYARD_CATALOG_CACHE_TTL_SECS",
            "60",
        )?);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            image_base_url,
            catalog_cache_ttl,
            log_json: get_optional_env("IRONYARD_LOG_FORMAT")
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default::<f32>(
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.1",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    parse_value(key, &raw)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the image base URL. A trailing slash is added so that `Url::join`
/// appends to the path instead of replacing its last segment.
fn parse_image_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).map_err(|e| {
        ConfigError::InvalidEnvVar("IRONYARD_IMAGE_BASE_URL".to_string(), e.to_string())
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "IRONYARD_IMAGE_BASE_URL".to_string(),
            "must be a hierarchical URL such as https://cdn.example.com/products/".to_string(),
        ));
    }
    Ok(url)
}
