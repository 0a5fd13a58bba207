//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Path normalization (trailing slashes)
//! 3. `TraceLayer` (`http_request` span)
//! 4. Request ID (recorded on the span, echoed in the response)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
