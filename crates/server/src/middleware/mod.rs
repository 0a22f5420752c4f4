//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (one `http_request` span per request)
//! 3. Request ID (add unique ID to each request)
//! 4. `CatchPanicLayer` (handler panics become JSON-API 500s)

pub mod request_id;

pub use request_id::request_id_middleware;
