#![allow(dead_code)]
use utoipa::OpenApi;

use crate::logic::{NewRule, RecurringSlotRule, RepeatCadence, RulePatch, RuleStatus, TimeOption};

#[utoipa::path(
    get,
    path = "/timeslots",
    responses(
        (status = 200, description = "All recurring time-slot rules", body = [RecurringSlotRule]),
        (status = 503, description = "Time-slot rules disabled")
    ),
    tag = "TimeSlots"
)]
fn doc_list_rules_handler() {}

#[utoipa::path(
    post,
    path = "/timeslots",
    responses(
        (status = 200, description = "Created rule, selected from the re-fetched list", body = RecurringSlotRule)
    ),
    tag = "TimeSlots"
)]
fn doc_create_rule_handler() {}

#[utoipa::path(
    patch,
    path = "/timeslots/{rule_id}",
    params(("rule_id" = String, Path, description = "Rule id")),
    request_body(content = RulePatch, example = json!({
        "days": [1, 3, 5],
        "end_time": "18:00"
    })),
    responses(
        (status = 200, description = "Updated rule", body = RecurringSlotRule),
        (status = 400, description = "Invalid weekday selection")
    ),
    tag = "TimeSlots"
)]
fn doc_update_rule_handler() {}

#[utoipa::path(
    delete,
    path = "/timeslots/{rule_id}",
    params(("rule_id" = String, Path, description = "Rule id")),
    responses(
        (status = 204, description = "Rule deleted")
    ),
    tag = "TimeSlots"
)]
fn doc_delete_rule_handler() {}

#[utoipa::path(
    get,
    path = "/timeslots/options",
    responses(
        (status = 200, description = "Half-hour time picker options", body = [TimeOption])
    ),
    tag = "TimeSlots"
)]
fn doc_time_options_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_list_rules_handler,
        doc_create_rule_handler,
        doc_update_rule_handler,
        doc_delete_rule_handler,
        doc_time_options_handler,
    ),
    components(
        schemas(
            RecurringSlotRule,
            NewRule,
            RulePatch,
            RepeatCadence,
            RuleStatus,
            TimeOption,
        )
    ),
    tags(
        (name = "TimeSlots", description = "Recurring availability templates")
    ),
    servers(
        (url = "/api", description = "Main API Prefix")
    )
)]
pub struct TimeSlotsApiDoc;
