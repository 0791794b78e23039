//! Feature flag handling for the Roofline application.
//!
//! This module provides utilities for working with feature flags in a more
//! maintainable way. It includes documentation on what each feature does and
//! helper functions for checking if features are enabled.
//!
//! ## Available Features
//!
//! - `openapi`: Enables OpenAPI documentation generation
//! - `scheduling`: Enables the inspection booking workflow
//! - `timeslots`: Enables the recurring time-slot rule editor
//! - `crm`: Enables the CRM record layer (leads, inspections)
//!
//! ## Usage
//!
//! Feature flags are used in two ways in the Roofline application:
//!
//! 1. Compile-time feature flags using `#[cfg(feature = "...")]`
//! 2. Runtime feature flags using configuration values
//!
//! This module provides helper functions for checking if features are enabled
//! at runtime based on configuration values.

use roofline_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// A feature counts as enabled when its `use_*` flag is set and its
/// configuration section is present.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the inspection booking workflow is enabled at runtime.
#[cfg(feature = "scheduling")]
pub fn is_scheduling_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_scheduling, config.scheduling.as_ref())
}

/// Check if the recurring time-slot rule editor is enabled at runtime.
#[cfg(feature = "timeslots")]
pub fn is_timeslots_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_timeslots, config.timeslots.as_ref())
}

/// Check if the CRM record layer is enabled at runtime.
#[cfg(feature = "crm")]
pub fn is_crm_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_crm, config.crm_api.as_ref())
}
