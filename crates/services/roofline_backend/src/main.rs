// File: services/roofline_backend/src/main.rs
use axum::{routing::get, Router};
use roofline_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::warn;

mod app_state;
mod service_factory;

use app_state::AppState;

#[cfg(feature = "crm")]
use roofline_crm::routes as crm_routes;
#[cfg(feature = "scheduling")]
use roofline_scheduling::routes as scheduling_routes;
#[cfg(feature = "timeslots")]
use roofline_timeslots::routes as timeslots_routes;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    roofline_common::logging::init();

    let state = AppState::new(config.clone());

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Roofline API!" }))
        .merge(roofline_common::routes());

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut router = api_router;
        #[cfg(feature = "scheduling")]
        {
            match (
                state.service_factory.scheduling_service(),
                state.service_factory.crm_service(),
            ) {
                (Some(scheduling), Some(crm)) => {
                    router = router.merge(scheduling_routes(config.clone(), scheduling, crm));
                }
                _ => warn!("Scheduling feature compiled in but not configured; routes skipped"),
            }
        }
        #[cfg(feature = "timeslots")]
        {
            if roofline_common::is_timeslots_enabled(&config) {
                router = router.merge(timeslots_routes(config.clone()));
            } else {
                warn!("Time-slots feature compiled in but not configured; routes skipped");
            }
        }
        #[cfg(feature = "crm")]
        {
            if roofline_common::is_crm_enabled(&config) {
                router = router.merge(crm_routes(config.clone()));
            } else {
                warn!("CRM feature compiled in but not configured; routes skipped");
            }
        }
        router
    });

    // The dashboard frontend calls from a different origin.
    #[allow(unused_mut)]
    let mut app = api_router.layer(CorsLayer::permissive());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use roofline_crm::openapi::CrmApiDoc;
        #[cfg(feature = "scheduling")]
        use roofline_scheduling::doc::SchedulingApiDoc;
        #[cfg(feature = "timeslots")]
        use roofline_timeslots::doc::TimeSlotsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Roofline API",
                version = "0.1.0",
                description = "Roofline Service API Docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Roofline", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        // Create the merged OpenAPI document
        #[allow(unused_mut)]
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "scheduling")]
        openapi_doc.merge(SchedulingApiDoc::openapi());
        #[cfg(feature = "timeslots")]
        openapi_doc.merge(TimeSlotsApiDoc::openapi());
        openapi_doc.merge(CrmApiDoc::openapi());
        println!("📖 Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
