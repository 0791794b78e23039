// --- File: crates/services/roofline_backend/src/app_state.rs ---
use roofline_common::services::ServiceFactory;
use roofline_config::AppConfig;
use std::sync::Arc;

use crate::service_factory::RooflineServiceFactory;

/// Application state shared across all routes.
///
/// Holds the loaded configuration and the service factory so every router is
/// wired from the same place; feature routers receive the clients they need
/// from here instead of constructing their own.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,

    /// Service factory for accessing the upstream CRM services.
    pub service_factory: Arc<dyn ServiceFactory>,
}

impl AppState {
    /// Create the application state from a loaded configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let service_factory = Arc::new(RooflineServiceFactory::new(config.clone()));
        Self {
            config,
            service_factory,
        }
    }
}
