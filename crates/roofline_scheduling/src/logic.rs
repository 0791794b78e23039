// --- File: crates/roofline_scheduling/src/logic.rs ---
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use roofline_common::services::{
    BookingRecord, CancelBookingRequest, CreateBookingRequest, CrmService, Inspection, Presence,
    RescheduleBookingRequest, SchedulingService, TimeSlot,
};

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Booking request failed: {0}")]
    BookingFailed(String),
    #[error("Cancellation request failed: {0}")]
    CancellationFailed(String),
    #[error("Reschedule request failed: {0}")]
    RescheduleFailed(String),
    #[error("Failed to re-fetch inspection after reschedule: {0}")]
    RefetchFailed(String),
}

// --- Data Structures ---

/// One calendar day's worth of bookable slots, deduplicated and ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

/// Outcome of a booking attempt. `lead_linked` is false when the booking
/// itself succeeded but the follow-up lead PATCH did not; callers that care
/// can detect the "booked but unlinked" state from it.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingOutcome {
    pub booking: BookingRecord,
    pub lead_linked: bool,
}

// --- Grouping & Formatting ---

/// Groups a flat slot list by calendar date.
///
/// Within a date, two slots with the same `(start_time, end_time)` are the
/// same logical slot regardless of `slot_id`; the first occurrence wins.
/// Groups come out sorted by date ascending, slots by start time ascending.
pub fn group_slots_by_date(slots: Vec<TimeSlot>) -> Vec<DaySlots> {
    let mut by_date: BTreeMap<NaiveDate, Vec<TimeSlot>> = BTreeMap::new();
    for slot in slots {
        by_date.entry(slot.date).or_default().push(slot);
    }
    by_date
        .into_iter()
        .map(|(date, mut day_slots)| {
            // Stable sort: duplicate ranges keep their input order, so the
            // retain below keeps the first occurrence.
            day_slots.sort_by_key(|s| s.start_time);
            let mut seen: HashSet<(DateTime<Utc>, DateTime<Utc>)> = HashSet::new();
            day_slots.retain(|s| seen.insert((s.start_time, s.end_time)));
            DaySlots {
                date,
                slots: day_slots,
            }
        })
        .collect()
}

/// Renders a date the way the dashboard shows day headers: `"Mon, Jun 10"`.
pub fn format_day_label(date: NaiveDate) -> String {
    format!("{}, {} {}", date.format("%a"), date.format("%b"), date.day())
}

/// Renders an instant as a 12-hour clock label in the business time zone,
/// omitting `:00` minutes: `"1 PM"`, `"1:30 PM"`.
pub fn format_time_of_day(instant: DateTime<Utc>, tz: Tz) -> String {
    let local = instant.with_timezone(&tz);
    let (is_pm, hour) = local.hour12();
    let meridiem = if is_pm { "PM" } else { "AM" };
    if local.minute() == 0 {
        format!("{} {}", hour, meridiem)
    } else {
        format!("{}:{:02} {}", hour, local.minute(), meridiem)
    }
}

/// Renders a slot's interval: `"1 PM - 2:30 PM"`.
pub fn format_time_range(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> String {
    format!(
        "{} - {}",
        format_time_of_day(start, tz),
        format_time_of_day(end, tz)
    )
}

// --- Booking Logic ---

/// Books an inspection slot, then best-effort links the booking back onto the
/// parent lead.
///
/// The link-back PATCH is deliberately non-fatal: once the booking POST has
/// succeeded the booking is considered successful, and a link failure is
/// logged and reported through `BookingOutcome::lead_linked` only. The two
/// writes are sequential, never parallel, because the PATCH needs the booking
/// id from the POST response.
pub async fn book_inspection<S, C>(
    scheduling: &S,
    crm: &C,
    request: CreateBookingRequest,
) -> Result<BookingOutcome, SchedulingError>
where
    S: SchedulingService + ?Sized,
    C: CrmService + ?Sized,
{
    // The selection state machine makes an incomplete submission unreachable
    // through the UI; re-validate anyway.
    if request.time_slot_id.trim().is_empty() {
        return Err(SchedulingError::ValidationError(
            "a time slot must be chosen before booking".to_string(),
        ));
    }
    if request.inspection_type_id.trim().is_empty() {
        return Err(SchedulingError::ValidationError(
            "an inspection type must be chosen before booking".to_string(),
        ));
    }

    let lead_id = request.lead_id.clone();
    let booking = scheduling
        .create_booking(request)
        .await
        .map_err(|e| SchedulingError::BookingFailed(e.to_string()))?;

    let mut lead_linked = false;
    if let Some(lead_id) = lead_id {
        match crm.link_booking_to_lead(&lead_id, &booking.id).await {
            Ok(()) => lead_linked = true,
            Err(e) => {
                // Booking stands; the link can be repaired later.
                warn!(
                    "booking {} created but linking to lead {} failed: {}",
                    booking.id, lead_id, e
                );
            }
        }
    }

    Ok(BookingOutcome {
        booking,
        lead_linked,
    })
}

/// Cancels an existing booking. A non-blank reason is mandatory.
pub async fn cancel_inspection<S>(
    scheduling: &S,
    request: CancelBookingRequest,
) -> Result<(), SchedulingError>
where
    S: SchedulingService + ?Sized,
{
    if request.reason.trim().is_empty() {
        return Err(SchedulingError::ValidationError(
            "a reason is required to cancel an inspection".to_string(),
        ));
    }

    scheduling
        .cancel_booking(request)
        .await
        .map_err(|e| SchedulingError::CancellationFailed(e.to_string()))
}

/// Moves an existing booking onto a new slot, then re-fetches the canonical
/// inspection record rather than trusting the mutation response, so the
/// returned state reflects server truth.
pub async fn reschedule_inspection<S, C>(
    scheduling: &S,
    crm: &C,
    request: RescheduleBookingRequest,
) -> Result<Inspection, SchedulingError>
where
    S: SchedulingService + ?Sized,
    C: CrmService + ?Sized,
{
    if request.reason.trim().is_empty() {
        return Err(SchedulingError::ValidationError(
            "a reason is required to reschedule an inspection".to_string(),
        ));
    }
    if request.new_time_slot_id.trim().is_empty() {
        return Err(SchedulingError::ValidationError(
            "a new time slot must be chosen before rescheduling".to_string(),
        ));
    }

    let inspection_id = request.inspection_id.clone();
    scheduling
        .reschedule_booking(request)
        .await
        .map_err(|e| SchedulingError::RescheduleFailed(e.to_string()))?;

    crm.get_inspection(&inspection_id)
        .await
        .map_err(|e| SchedulingError::RefetchFailed(e.to_string()))
}

/// Derives the calendar date a booking request should carry from the chosen
/// slot's start time, rendered in the business time zone.
pub fn date_of_inspection_for(slot: &TimeSlot, tz: Tz) -> NaiveDate {
    slot.start_time.with_timezone(&tz).date_naive()
}

/// Seeds a presence default for a re-entered flow from the existing booking.
pub fn presence_default_from(booking: &BookingRecord) -> Option<Presence> {
    booking.will_someone_be_present
}
