// --- File: crates/roofline_scheduling/src/routes.rs ---

use crate::handlers::{
    book_inspection_handler, cancel_inspection_handler, get_availability_handler,
    reschedule_inspection_handler, SchedulingState,
};
use axum::{
    routing::{get, post},
    Router,
};

use roofline_common::services::{BoxedError, CrmService, SchedulingService};
use roofline_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the inspection booking workflow.
///
/// The upstream services are injected rather than constructed here so the
/// backend can hand the same clients to every feature router (and tests can
/// hand in fakes).
pub fn routes(
    config: Arc<AppConfig>,
    scheduling: Arc<dyn SchedulingService<Error = BoxedError>>,
    crm: Arc<dyn CrmService<Error = BoxedError>>,
) -> Router {
    let state = Arc::new(SchedulingState {
        config,
        scheduling,
        crm,
    });

    Router::new()
        .route("/scheduling/availability", get(get_availability_handler))
        .route("/scheduling/book", post(book_inspection_handler))
        .route("/scheduling/cancel", post(cancel_inspection_handler))
        .route("/scheduling/reschedule", post(reschedule_inspection_handler))
        .with_state(state)
}
