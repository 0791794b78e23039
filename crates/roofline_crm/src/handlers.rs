//! HTTP handlers for the CRM record layer
//!
//! Thin read/update surface over the upstream lead, inspection, contact and
//! property records. Errors are surfaced inline, near the action that caused
//! them; nothing bubbles to a global error boundary.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use roofline_common::services::{Inspection, Lead};

use crate::client::{CrmClient, CrmError};
use crate::models::LeadPatch;

/// Shared state for CRM handlers
#[derive(Clone)]
pub struct CrmState {
    pub client: Arc<CrmClient>,
}

fn into_http(err: CrmError) -> (StatusCode, String) {
    match &err {
        CrmError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CrmError::AuthError(_) => (StatusCode::UNAUTHORIZED, err.to_string()),
        CrmError::ApiError { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ListQuery {
    pub location_id: Option<String>,
}

/// Handler to fetch a single lead.
#[axum::debug_handler]
pub async fn get_lead_handler(
    State(state): State<Arc<CrmState>>,
    Path(lead_id): Path<String>,
) -> Result<Json<Lead>, (StatusCode, String)> {
    state
        .client
        .get_lead(&lead_id)
        .await
        .map(Json)
        .map_err(|e| {
            info!("Error fetching lead {}: {}", lead_id, e);
            into_http(e)
        })
}

/// Handler to apply a partial update to a lead.
#[axum::debug_handler]
pub async fn update_lead_handler(
    State(state): State<Arc<CrmState>>,
    Path(lead_id): Path<String>,
    Json(patch): Json<LeadPatch>,
) -> Result<Json<Lead>, (StatusCode, String)> {
    state
        .client
        .update_lead(&lead_id, &patch)
        .await
        .map(Json)
        .map_err(|e| {
            info!("Error updating lead {}: {}", lead_id, e);
            into_http(e)
        })
}

/// Handler to list leads for a location.
#[axum::debug_handler]
pub async fn list_leads_handler(
    State(state): State<Arc<CrmState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Lead>>, (StatusCode, String)> {
    state
        .client
        .list_leads(query.location_id.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            info!("Error listing leads: {}", e);
            into_http(e)
        })
}

/// Handler to fetch an inspection joined with its booking.
#[axum::debug_handler]
pub async fn get_inspection_handler(
    State(state): State<Arc<CrmState>>,
    Path(inspection_id): Path<String>,
) -> Result<Json<Inspection>, (StatusCode, String)> {
    state
        .client
        .get_inspection(&inspection_id)
        .await
        .map(Json)
        .map_err(|e| {
            info!("Error fetching inspection {}: {}", inspection_id, e);
            into_http(e)
        })
}

/// Handler to list inspections for a location.
#[axum::debug_handler]
pub async fn list_inspections_handler(
    State(state): State<Arc<CrmState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Inspection>>, (StatusCode, String)> {
    state
        .client
        .list_inspections(query.location_id.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            info!("Error listing inspections: {}", e);
            into_http(e)
        })
}
