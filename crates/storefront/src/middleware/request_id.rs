//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` (Cloudflare, load balancer) when it looks
//! sane, otherwise generates a UUID v4. The ID is recorded on the current
//! span, tagged on the Sentry scope, stored in request extensions as
//! [`RequestId`] and echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upstream IDs longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID available to handlers via `Extension<RequestId>`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn upstream_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    valid.then(|| id.to_string())
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_accepted() {
        let value = HeaderValue::from_static("cf-8d2f1a_01.edge");
        assert_eq!(upstream_id(&value).as_deref(), Some("cf-8d2f1a_01.edge"));
    }

    #[test]
    fn test_suspicious_upstream_id_rejected() {
        assert_eq!(upstream_id(&HeaderValue::from_static("")), None);
        assert_eq!(upstream_id(&HeaderValue::from_static("a b")), None);
        assert_eq!(upstream_id(&HeaderValue::from_static("<script>")), None);
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_eq!(upstream_id(&HeaderValue::from_str(&long).unwrap()), None);
    }
}
