// --- File: crates/roofline_common/src/routes.rs ---

// Route definitions that are common across the application.

use crate::handlers::health_handler;
use axum::{routing::get, Router};

/// Creates a router containing common routes that can be used across the application.
///
/// # Returns
/// A router configured with common routes.
pub fn routes() -> Router {
    Router::new().route("/healthz", get(health_handler))
}
