#![allow(dead_code)]
use utoipa::OpenApi;

use crate::models::{Contact, LeadPatch, Property};
use roofline_common::services::{BookingRecord, Inspection, Lead};

#[utoipa::path(
    get,
    path = "/leads/{lead_id}",
    params(("lead_id" = String, Path, description = "Lead record id")),
    responses(
        (status = 200, description = "Lead record", body = Lead),
        (status = 404, description = "Lead not found"),
        (status = 502, description = "Upstream CRM error")
    ),
    tag = "CRM"
)]
fn doc_get_lead_handler() {}

#[utoipa::path(
    patch,
    path = "/leads/{lead_id}",
    params(("lead_id" = String, Path, description = "Lead record id")),
    request_body(content = LeadPatch, example = json!({
        "inspection_booking_id": "b1"
    })),
    responses(
        (status = 200, description = "Updated lead record", body = Lead),
        (status = 404, description = "Lead not found")
    ),
    tag = "CRM"
)]
fn doc_update_lead_handler() {}

#[utoipa::path(
    get,
    path = "/inspections/{inspection_id}",
    params(("inspection_id" = String, Path, description = "Inspection record id")),
    responses(
        (status = 200, description = "Inspection joined with its booking", body = Inspection),
        (status = 404, description = "Inspection not found")
    ),
    tag = "CRM"
)]
fn doc_get_inspection_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_lead_handler,
        doc_update_lead_handler,
        doc_get_inspection_handler,
    ),
    components(
        schemas(
            Lead,
            LeadPatch,
            Inspection,
            BookingRecord,
            Contact,
            Property,
        )
    ),
    tags(
        (name = "CRM", description = "Upstream CRM record layer")
    ),
    servers(
        (url = "/api", description = "Main API Prefix")
    )
)]
pub struct CrmApiDoc;
