//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions, holds the cart snapshot)
//! 6. Rate limiting on order submission routes (governor)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use rate_limit::order_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::session_layer;
