//! Integration tests for the Ironyard storefront.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`:
//! an in-memory session store stands in for `PostgreSQL` sessions, and the
//! database pool points at an address where nothing listens, so every
//! request that reaches the database fails fast. That covers everything
//! decided before the database (cart, validation, rate limits, error
//! bodies) without external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ironyard-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use ironyard_storefront::config::StorefrontConfig;
use ironyard_storefront::middleware::session::SESSION_COOKIE_NAME;
use ironyard_storefront::state::AppState;

/// Nothing listens on port 1, so connections are refused immediately.
const UNREACHABLE_DATABASE_URL: &str = "postgres://ironyard@127.0.0.1:1/ironyard_test";

/// Configuration used by every test app.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from(UNREACHABLE_DATABASE_URL),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        image_base_url: None,
        catalog_cache_ttl: Duration::from_secs(60),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or the raw text as a JSON string when it is not JSON.
    pub body: Value,
}

/// A storefront router plus the session cookie of one simulated browser.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Build a fresh app with its own session store and rate limiters.
    ///
    /// Must be called inside a Tokio runtime (the lazy pool spawns its
    /// maintenance task).
    ///
    /// # Panics
    ///
    /// Panics if the lazy pool cannot be created from the test URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let config = test_config();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy(UNREACHABLE_DATABASE_URL)
            .expect("test database URL parses");
        let state = AppState::new(config, pool);

        Self {
            router: ironyard_storefront::app(state, MemoryStore::default()),
            cookie: None,
        }
    }

    /// Session cookie value (`iy_session=...`) once one has been issued.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Forget the session cookie, as a new browser would.
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    /// Send a request, replaying and capturing the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails, which
    /// only happens on a broken test.
    #[allow(clippy::expect_used)]
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `iy_session=<value>` from `Set-Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}

/// JSON descriptor for a product as the storefront client sends it.
#[must_use]
pub fn descriptor(id: &str, price: f64) -> Value {
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "image": format!("/images/{id}.jpg"),
        "category": "Shop Equipment",
    })
}

/// Checkout form body.
#[must_use]
pub fn customer(email: &str) -> Value {
    serde_json::json!({
        "firstName": "Dana",
        "lastName": "Okafor",
        "email": email,
        "phone": "555-0142",
        "company": "Millworks Fabrication",
        "address": "12 Foundry Rd",
        "city": "Cleveland",
        "state": "OH",
        "zip": "44101",
        "country": "US",
    })
}
