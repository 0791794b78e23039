#![allow(dead_code)]
use utoipa::OpenApi;

use crate::handlers::{
    AvailabilityQuery, AvailableDay, AvailableDaysResponse, BookInspectionRequest,
    BookInspectionResponse, CancelInspectionRequest, CancellationResponse,
    RescheduleInspectionRequest, RescheduleResponse, SlotView,
};
use roofline_common::services::{BookingRecord, Presence, TimeSlot};

#[utoipa::path(
    get,
    path = "/scheduling/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable slots grouped by day", body = AvailableDaysResponse),
        (status = 400, description = "Bad request (e.g., invalid date format)"),
        (status = 503, description = "Scheduling disabled")
    ),
    tag = "Scheduling"
)]
fn doc_get_availability_handler() {}

#[utoipa::path(
    post,
    path = "/scheduling/book",
    request_body(content = BookInspectionRequest, example = json!({
        "lead_id": "42",
        "inspection_type_id": "roof",
        "slot": {
            "slot_id": "s1",
            "start_time": "2024-06-10T13:00:00Z",
            "end_time": "2024-06-10T14:00:00Z",
            "date": "2024-06-10"
        },
        "will_someone_be_present": "yes"
    })),
    responses(
        (status = 200, description = "Inspection booked", body = BookInspectionResponse),
        (status = 400, description = "Incomplete selection"),
        (status = 502, description = "Upstream booking failure")
    ),
    tag = "Scheduling"
)]
fn doc_book_inspection_handler() {}

#[utoipa::path(
    post,
    path = "/scheduling/cancel",
    request_body(content = CancelInspectionRequest, example = json!({
        "inspection_id": "i1",
        "booking_id": "b1",
        "reason": "customer requested",
        "confirmed": true
    })),
    responses(
        (status = 200, description = "Booking cancelled", body = CancellationResponse),
        (status = 400, description = "Missing reason"),
        (status = 428, description = "Confirmation required")
    ),
    tag = "Scheduling"
)]
fn doc_cancel_inspection_handler() {}

#[utoipa::path(
    post,
    path = "/scheduling/reschedule",
    request_body(content = RescheduleInspectionRequest, example = json!({
        "booking_id": "b1",
        "inspection_id": "i1",
        "new_slot": {
            "slot_id": "s2",
            "start_time": "2024-06-12T09:00:00Z",
            "end_time": "2024-06-12T10:00:00Z",
            "date": "2024-06-12"
        },
        "will_someone_be_present": "yes",
        "reason": "customer requested",
        "confirmed": true
    })),
    responses(
        (status = 200, description = "Booking moved; canonical inspection returned", body = RescheduleResponse),
        (status = 400, description = "Missing reason or incomplete selection"),
        (status = 428, description = "Confirmation required")
    ),
    tag = "Scheduling"
)]
fn doc_reschedule_inspection_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_availability_handler,
        doc_book_inspection_handler,
        doc_cancel_inspection_handler,
        doc_reschedule_inspection_handler,
    ),
    components(
        schemas(
            AvailableDaysResponse,
            AvailableDay,
            SlotView,
            TimeSlot,
            Presence,
            BookingRecord,
            BookInspectionRequest,
            BookInspectionResponse,
            CancelInspectionRequest,
            CancellationResponse,
            RescheduleInspectionRequest,
            RescheduleResponse,
        )
    ),
    tags(
        (name = "Scheduling", description = "Inspection booking workflow")
    ),
    servers(
        (url = "/api", description = "Main API Prefix")
    )
)]
pub struct SchedulingApiDoc;
