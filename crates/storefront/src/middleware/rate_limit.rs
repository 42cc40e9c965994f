//! Rate limiting for order submission using governor and `tower_governor`.
//!
//! Browsing and cart edits are not limited. Creating orders is: every
//! accepted request writes rows that someone follows up by hand.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::http::{HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::AppError;

/// Proxy headers carrying the client address, most trusted first.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

/// Key extractor that reads the client IP from proxy headers.
///
/// `X-Forwarded-For` contributes its first (client) entry. Requests carrying
/// none of the headers share a single bucket.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req.headers()).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)))
    }
}

fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    CLIENT_IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    })
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for order submission: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn order_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config)).error_handler(limiter_error_response)
}

/// Limiter rejections use the same JSON error bodies as the handlers.
///
/// `Retry-After` and the rate limit headers from the limiter are kept.
fn limiter_error_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { headers, .. } => {
            let mut response = AppError::RateLimited.into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        other => AppError::Internal(format!("rate limiter failed: {other:?}")).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use axum::http::{HeaderValue, StatusCode};

    use super::*;

    #[test]
    fn test_cloudflare_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.7"));
        assert_eq!(client_ip(&headers), "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_forwarded_for_uses_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.4, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "198.51.100.4".parse().ok());
    }

    #[test]
    fn test_garbage_headers_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("nope"));
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));
        assert_eq!(client_ip(&headers), "2001:db8::1".parse().ok());
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_rejection_is_json_and_keeps_limiter_headers() {
        let mut limiter_headers = HeaderMap::new();
        limiter_headers.insert("retry-after", HeaderValue::from_static("1"));
        let response = limiter_error_response(GovernorError::TooManyRequests {
            wait_time: 1,
            headers: Some(limiter_headers),
        });

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "1");
        assert_eq!(response.headers()["content-type"], "application/json");
    }

    #[test]
    fn test_key_extraction_failure_is_internal_error() {
        let response = limiter_error_response(GovernorError::UnableToExtractKey);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
