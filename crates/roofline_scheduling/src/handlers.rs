// File: crates/roofline_scheduling/src/handlers.rs
use crate::logic::{
    book_inspection, cancel_inspection, date_of_inspection_for, format_day_label,
    format_time_range, group_slots_by_date, reschedule_inspection, SchedulingError,
};
use crate::replace::{ReplaceAction, ReplaceCommand, ReplaceFlow};
use crate::selection::SelectionFlow;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use roofline_common::services::{
    BookingRecord, BoxedError, CrmService, Inspection, Presence, SchedulingService, SlotQuery,
    TimeSlot,
};
use roofline_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

// Define shared state needed by scheduling handlers
#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub scheduling: Arc<dyn SchedulingService<Error = BoxedError>>,
    pub crm: Arc<dyn CrmService<Error = BoxedError>>,
}

impl SchedulingState {
    /// The zone slot labels render in.
    fn business_zone(&self) -> Tz {
        self.config
            .scheduling
            .as_ref()
            .and_then(|s| s.time_zone.as_deref())
            .and_then(|tz| Tz::from_str(tz).ok())
            .unwrap_or(Tz::America__Chicago)
    }
}

fn into_http(err: SchedulingError) -> (StatusCode, String) {
    match &err {
        SchedulingError::ValidationError(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        _ => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

// --- Availability ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Location to fetch slots for; defaults to the configured location.
    pub location_id: Option<String>,

    /// Single date in YYYY-MM-DD format
    pub date: Option<String>,

    /// Range start in YYYY-MM-DD format
    pub start_date: Option<String>,

    /// Range end in YYYY-MM-DD format
    pub end_date: Option<String>,
}

/// A slot as the dashboard renders it.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotView {
    pub slot_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// e.g. "1 PM - 2:30 PM"
    pub label: String,
}

/// One day's group of bookable slots.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailableDay {
    pub date: NaiveDate,
    /// e.g. "Mon, Jun 10"
    pub label: String,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailableDaysResponse {
    pub days: Vec<AvailableDay>,
}

fn parse_query_date(
    value: &Option<String>,
    field: &str,
) -> Result<Option<NaiveDate>, (StatusCode, String)> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some).map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid {} format (YYYY-MM-DD)", field),
            )
        }),
    }
}

/// Handler to get available inspection slots, grouped by day.
#[axum::debug_handler]
pub async fn get_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableDaysResponse>, (StatusCode, String)> {
    // Ensure the scheduling feature is enabled via runtime config
    if !state.config.use_scheduling {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Scheduling service is disabled.".to_string(),
        ));
    }

    let date = parse_query_date(&query.date, "date")?;
    let start_date = parse_query_date(&query.start_date, "start_date")?;
    let end_date = parse_query_date(&query.end_date, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err((
                StatusCode::BAD_REQUEST,
                "end_date must be after start_date".to_string(),
            ));
        }
    }

    let location_id = query.location_id.or_else(|| {
        state
            .config
            .crm_api
            .as_ref()
            .and_then(|c| c.location_id.clone())
    });

    let slot_query = SlotQuery {
        location_id,
        date,
        start_date,
        end_date,
    };

    // A fetch or decode failure surfaces as "no slots available"; the raw
    // payload has already been logged by the service layer.
    let slots = match state.scheduling.fetch_available_slots(slot_query).await {
        Ok(slots) => slots,
        Err(e) => {
            info!("Error fetching available slots: {}", e);
            Vec::new()
        }
    };

    let tz = state.business_zone();
    let days = group_slots_by_date(slots)
        .into_iter()
        .map(|day| AvailableDay {
            label: format_day_label(day.date),
            date: day.date,
            slots: day
                .slots
                .into_iter()
                .map(|slot| SlotView {
                    label: format_time_range(slot.start_time, slot.end_time, tz),
                    slot_id: slot.slot_id,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                })
                .collect(),
        })
        .collect();

    Ok(Json(AvailableDaysResponse { days }))
}

// --- Booking ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookInspectionRequest {
    pub lead_id: Option<String>,
    pub property_id: Option<String>,
    pub inspection_type_id: String,
    pub location_id: Option<String>,
    /// The chosen slot, exactly as returned by the availability endpoint.
    pub slot: TimeSlot,
    pub will_someone_be_present: Presence,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookInspectionResponse {
    pub success: bool,
    pub booking: BookingRecord,
    /// False when the booking stands but the lead link-back PATCH failed.
    pub lead_linked: bool,
    pub message: String,
}

/// Handler to book an inspection slot.
#[axum::debug_handler]
pub async fn book_inspection_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<BookInspectionRequest>,
) -> Result<Json<BookInspectionResponse>, (StatusCode, String)> {
    if !state.config.use_scheduling {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Scheduling service is disabled.".to_string(),
        ));
    }

    // Walk the selection machine with the submitted fields; a request the UI
    // could not have produced is rejected before anything is written.
    let mut flow = SelectionFlow::open(None, None);
    flow.select_date(payload.slot.date);
    flow.select_slot(payload.slot.clone())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    flow.set_inspection_type(payload.inspection_type_id.clone());
    flow.set_presence(payload.will_someone_be_present);
    if !flow.ready_to_submit() {
        return Err((
            StatusCode::BAD_REQUEST,
            "date, time, inspection type and presence must all be set".to_string(),
        ));
    }
    flow.begin_submit()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let tz = state.business_zone();
    let request = roofline_common::services::CreateBookingRequest {
        lead_id: payload.lead_id,
        property_id: payload.property_id,
        inspection_type_id: payload.inspection_type_id,
        location_id: payload.location_id,
        date_of_inspection: date_of_inspection_for(&payload.slot, tz),
        time_slot_id: payload.slot.slot_id.clone(),
        will_someone_be_present: payload.will_someone_be_present,
    };

    match book_inspection(state.scheduling.as_ref(), state.crm.as_ref(), request).await {
        Ok(outcome) => {
            info!("Successfully booked inspection: {}", outcome.booking.id);
            flow.complete(outcome.booking.clone());
            Ok(Json(BookInspectionResponse {
                success: true,
                booking: outcome.booking,
                lead_linked: outcome.lead_linked,
                message: "Inspection booked successfully.".to_string(),
            }))
        }
        Err(e) => {
            info!("Error booking inspection: {}", e);
            flow.fail();
            Err(into_http(e))
        }
    }
}

// --- Cancellation ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelInspectionRequest {
    pub inspection_id: String,
    pub booking_id: String,
    /// Free-text reason; mandatory, whitespace-only is rejected.
    pub reason: String,
    /// The caller's answer to the confirmation dialog. The cancel is refused
    /// until this is true; the reason form never submits directly.
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
}

/// Handler to cancel an existing inspection booking.
#[axum::debug_handler]
pub async fn cancel_inspection_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<CancelInspectionRequest>,
) -> Result<Json<CancellationResponse>, (StatusCode, String)> {
    let mut flow = ReplaceFlow::from_ids(&payload.booking_id, &payload.inspection_id);
    flow.choose_action(ReplaceAction::Cancel);
    flow.set_reason(&payload.reason);
    flow.request_confirmation()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if !payload.confirmed {
        flow.decline();
        return Err((
            StatusCode::PRECONDITION_REQUIRED,
            "cancellation must be confirmed".to_string(),
        ));
    }
    let command = flow
        .confirm()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let ReplaceCommand::Cancel(request) = command else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "unexpected replace command".to_string(),
        ));
    };

    match cancel_inspection(state.scheduling.as_ref(), request).await {
        Ok(()) => {
            flow.complete();
            Ok(Json(CancellationResponse {
                success: true,
                message: "Inspection cancelled successfully.".to_string(),
            }))
        }
        Err(e) => {
            info!("Error cancelling inspection: {}", e);
            flow.fail();
            Err(into_http(e))
        }
    }
}

// --- Reschedule ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RescheduleInspectionRequest {
    pub booking_id: String,
    pub inspection_id: String,
    /// The newly chosen slot.
    pub new_slot: TimeSlot,
    pub will_someone_be_present: Option<Presence>,
    pub reason: String,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RescheduleResponse {
    pub success: bool,
    /// The canonical inspection record, re-fetched after the mutation.
    pub inspection: Inspection,
    pub message: String,
}

/// Handler to move an existing booking onto a new slot.
#[axum::debug_handler]
pub async fn reschedule_inspection_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<RescheduleInspectionRequest>,
) -> Result<Json<RescheduleResponse>, (StatusCode, String)> {
    let mut flow = ReplaceFlow::from_ids(&payload.booking_id, &payload.inspection_id);
    flow.choose_action(ReplaceAction::Reschedule);
    flow.set_reason(&payload.reason);
    flow.selection_mut().select_date(payload.new_slot.date);
    flow.selection_mut()
        .select_slot(payload.new_slot.clone())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if let Some(presence) = payload.will_someone_be_present {
        flow.selection_mut().set_presence(presence);
    }
    flow.request_confirmation()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if !payload.confirmed {
        flow.decline();
        return Err((
            StatusCode::PRECONDITION_REQUIRED,
            "reschedule must be confirmed".to_string(),
        ));
    }
    let command = flow
        .confirm()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let ReplaceCommand::Reschedule(request) = command else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "unexpected replace command".to_string(),
        ));
    };

    match reschedule_inspection(state.scheduling.as_ref(), state.crm.as_ref(), request).await {
        Ok(inspection) => {
            flow.complete();
            Ok(Json(RescheduleResponse {
                success: true,
                inspection,
                message: "Inspection rescheduled successfully.".to_string(),
            }))
        }
        Err(e) => {
            info!("Error rescheduling inspection: {}", e);
            flow.fail();
            Err(into_http(e))
        }
    }
}
