use axum::{
    routing::{get, patch},
    Router,
};
use roofline_config::AppConfig;
use std::sync::Arc;
use tracing::info;

use crate::client::CrmClient;
use crate::handlers::{
    get_inspection_handler, get_lead_handler, list_inspections_handler, list_leads_handler,
    update_lead_handler, CrmState,
};

/// Creates a router containing all routes for the CRM record layer.
///
/// # Arguments
///
/// * `config` - The application configuration, which includes the CRM API settings
///
/// # Returns
///
/// An Axum router with the record endpoints
pub fn routes(config: Arc<AppConfig>) -> Router {
    let crm_config = config
        .crm_api
        .as_ref()
        .expect("CRM API config missing")
        .clone();
    let state = Arc::new(CrmState {
        client: Arc::new(CrmClient::new(crm_config)),
    });

    info!("CRM record routes initialized");

    Router::new()
        .route("/leads", get(list_leads_handler))
        .route("/leads/{lead_id}", get(get_lead_handler))
        .route("/leads/{lead_id}", patch(update_lead_handler))
        .route("/inspections", get(list_inspections_handler))
        .route("/inspections/{inspection_id}", get(get_inspection_handler))
        .with_state(state)
}
