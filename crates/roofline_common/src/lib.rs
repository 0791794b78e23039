// --- File: crates/roofline_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod handlers; // HTTP request handlers
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod routes; // Route definitions
pub mod services; // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    conflict, not_found, upstream_error, validation_error, Context, HttpStatusCode, RooflineError,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{delete, get, patch, post, HTTP_CLIENT},
    map_json_error, IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error, log_result};

// Re-export feature flag handling utilities for easier access
pub use features::is_feature_enabled;

// Conditionally re-export feature-specific functions
#[cfg(feature = "scheduling")]
pub use features::is_scheduling_enabled;

#[cfg(feature = "timeslots")]
pub use features::is_timeslots_enabled;

#[cfg(feature = "crm")]
pub use features::is_crm_enabled;
