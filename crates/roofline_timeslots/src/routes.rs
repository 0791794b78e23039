// --- File: crates/roofline_timeslots/src/routes.rs ---

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use roofline_config::AppConfig;
use std::sync::Arc;
use tracing::info;

use roofline_crm::CrmClient;

use crate::handlers::{
    create_rule_handler, delete_rule_handler, list_rules_handler, time_options_handler,
    update_rule_handler, TimeSlotsState,
};
use crate::store::CrmRuleStore;

/// Creates a router containing all routes for the recurring time-slot rules.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let crm_config = config
        .crm_api
        .as_ref()
        .expect("CRM API config missing")
        .clone();
    let store = Arc::new(CrmRuleStore::new(Arc::new(CrmClient::new(crm_config))));
    let state = Arc::new(TimeSlotsState { config, store });

    info!("Time-slot rule routes initialized");

    Router::new()
        .route("/timeslots", get(list_rules_handler))
        .route("/timeslots", post(create_rule_handler))
        .route("/timeslots/options", get(time_options_handler))
        .route("/timeslots/{rule_id}", patch(update_rule_handler))
        .route("/timeslots/{rule_id}", delete(delete_rule_handler))
        .with_state(state)
}
