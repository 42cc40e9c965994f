//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding; clients only ever see a generic message for
//! them. Every error body is JSON.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::catalog::FilterError;
use crate::models::order::OrderValidationError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Recording an order request failed.
    #[error("Order creation failed: {0}")]
    OrderFailed(#[source] RepositoryError),

    /// Order request refused before reaching the database.
    #[error(transparent)]
    InvalidOrder(#[from] OrderValidationError),

    /// Listing query could not be parsed.
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),

    /// Resource not found. The message is shown to the client.
    #[error("{0}")]
    NotFound(String),

    /// Request body was not the expected JSON. Keeps the rejection's status.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Order submissions from this client are being throttled.
    #[error("Too many requests, please try again later")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::OrderFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidOrder(_) | Self::InvalidFilter(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidBody(rejection) => rejection.status(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match &self {
            Self::OrderFailed(_) => json!({
                "success": false,
                "error": "Failed to create order",
            }),
            Self::Database(_) | Self::Internal(_) => json!({"error": "Internal server error"}),
            Self::BadRequest(msg) => json!({"error": msg}),
            _ => json!({"error": self.to_string()}),
        };

        (status, Json(body)).into_response()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
