// File: crates/roofline_timeslots/src/handlers.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use roofline_config::AppConfig;
use roofline_crm::CrmError;

use crate::editor::select_created;
use crate::logic::{
    half_hour_options, validate_days, NewRule, RecurringSlotRule, RulePatch, TimeOption,
};
use crate::store::{CrmRuleStore, RuleStore};

// Define shared state needed by time-slot handlers
#[derive(Clone)]
pub struct TimeSlotsState {
    pub config: Arc<AppConfig>,
    pub store: Arc<CrmRuleStore>,
}

impl TimeSlotsState {
    fn defaults(&self) -> NewRule {
        let timeslots = self.config.timeslots.as_ref();
        NewRule::defaults(
            timeslots
                .and_then(|t| t.default_start_time.as_deref())
                .unwrap_or("09:00"),
            timeslots
                .and_then(|t| t.default_end_time.as_deref())
                .unwrap_or("17:00"),
        )
    }

    fn ensure_enabled(&self) -> Result<(), (StatusCode, String)> {
        if !self.config.use_timeslots {
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "Time-slot rules are disabled.".to_string(),
            ));
        }
        Ok(())
    }
}

fn into_http(err: CrmError) -> (StatusCode, String) {
    match &err {
        CrmError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CrmError::AuthError(_) => (StatusCode::UNAUTHORIZED, err.to_string()),
        CrmError::ApiError { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// Handler to list all recurring time-slot rules.
#[axum::debug_handler]
pub async fn list_rules_handler(
    State(state): State<Arc<TimeSlotsState>>,
) -> Result<Json<Vec<RecurringSlotRule>>, (StatusCode, String)> {
    state.ensure_enabled()?;
    state.store.list().await.map(Json).map_err(|e| {
        info!("Error listing time-slot rules: {}", e);
        into_http(e)
    })
}

/// Handler to create a rule from the fixed defaults.
///
/// After the insert the full list is re-fetched and the created entry selected
/// by id, falling back to the last entry when the id can't be matched.
#[axum::debug_handler]
pub async fn create_rule_handler(
    State(state): State<Arc<TimeSlotsState>>,
) -> Result<Json<RecurringSlotRule>, (StatusCode, String)> {
    state.ensure_enabled()?;

    let created = state
        .store
        .create(state.defaults())
        .await
        .map_err(|e| {
            info!("Error creating time-slot rule: {}", e);
            into_http(e)
        })?;
    let list = state.store.list().await.map_err(|e| {
        info!("Error re-fetching time-slot rules: {}", e);
        into_http(e)
    })?;

    let selected = select_created(&created.id, list).unwrap_or(created);
    Ok(Json(selected))
}

/// Handler to apply a (debounced, client-side) field update to a rule.
#[axum::debug_handler]
pub async fn update_rule_handler(
    State(state): State<Arc<TimeSlotsState>>,
    Path(rule_id): Path<String>,
    Json(patch): Json<RulePatch>,
) -> Result<Json<RecurringSlotRule>, (StatusCode, String)> {
    state.ensure_enabled()?;

    if let Some(days) = &patch.days {
        validate_days(days).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    }

    state
        .store
        .update(&rule_id, patch)
        .await
        .map(Json)
        .map_err(|e| {
            info!("Error updating time-slot rule {}: {}", rule_id, e);
            into_http(e)
        })
}

/// Handler to delete a rule. Immediate; no confirmation step.
#[axum::debug_handler]
pub async fn delete_rule_handler(
    State(state): State<Arc<TimeSlotsState>>,
    Path(rule_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.ensure_enabled()?;

    state
        .store
        .delete(&rule_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| {
            info!("Error deleting time-slot rule {}: {}", rule_id, e);
            into_http(e)
        })
}

/// Handler for the time picker option list.
#[axum::debug_handler]
pub async fn time_options_handler() -> Json<Vec<TimeOption>> {
    Json(half_hour_options())
}
