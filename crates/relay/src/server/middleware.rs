//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, permissive CORS for the
//! demo front end, and response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes. Must stay above the
/// SFE request deadline so the backend timeout surfaces first as a 502.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
