//! End-to-end tests for the booking and reschedule flows, driven through the
//! real router against recording fakes.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use roofline_scheduling::routes;

use fixtures::{slot, test_config, utc, RecordingCrm, RecordingScheduling};

fn router_with(
    scheduling: Arc<RecordingScheduling>,
    crm: Arc<RecordingCrm>,
) -> axum::Router {
    routes(test_config(), scheduling, crm)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn booking_flow_end_to_end() {
    let scheduling = Arc::new(RecordingScheduling::with_slots(vec![slot(
        "s1",
        "2024-06-10",
        utc(2024, 6, 10, 13, 0),
        utc(2024, 6, 10, 14, 0),
    )]));
    let crm = Arc::new(RecordingCrm::default());
    let app = router_with(scheduling.clone(), crm.clone());

    // Step 1: the flow opens and fetches availability.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/scheduling/availability?start_date=2024-06-10&end_date=2024-06-14")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["days"][0]["date"], "2024-06-10");
    assert_eq!(body["days"][0]["label"], "Mon, Jun 10");
    assert_eq!(body["days"][0]["slots"][0]["label"], "1 PM - 2 PM");

    // Step 2: the user picks the 1 PM slot, type and presence, and books.
    let response = app
        .clone()
        .oneshot(post_json(
            "/scheduling/book",
            json!({
                "lead_id": "42",
                "property_id": "p1",
                "inspection_type_id": "roof",
                "slot": {
                    "slot_id": "s1",
                    "start_time": "2024-06-10T13:00:00Z",
                    "end_time": "2024-06-10T14:00:00Z",
                    "date": "2024-06-10"
                },
                "will_someone_be_present": "yes"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["lead_linked"], true);
    assert_eq!(body["booking"]["id"], "b1");

    // Exactly one booking POST, with the date derived from the slot's start
    // time and the slot's identifier.
    let created = scheduling.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].time_slot_id, "s1");
    assert_eq!(
        created[0].date_of_inspection,
        "2024-06-10".parse::<chrono::NaiveDate>().unwrap()
    );

    // Followed by exactly one lead PATCH carrying the returned booking id.
    assert_eq!(
        crm.linked.lock().unwrap().as_slice(),
        &[("42".to_string(), "b1".to_string())]
    );
}

#[tokio::test]
async fn booking_reports_success_when_the_lead_link_fails() {
    let scheduling = Arc::new(RecordingScheduling::default());
    let crm = Arc::new(RecordingCrm {
        fail_link: true,
        ..RecordingCrm::default()
    });
    let app = router_with(scheduling.clone(), crm.clone());

    let response = app
        .oneshot(post_json(
            "/scheduling/book",
            json!({
                "lead_id": "42",
                "inspection_type_id": "roof",
                "slot": {
                    "slot_id": "s1",
                    "start_time": "2024-06-10T13:00:00Z",
                    "end_time": "2024-06-10T14:00:00Z",
                    "date": "2024-06-10"
                },
                "will_someone_be_present": "yes"
            }),
        ))
        .await
        .unwrap();

    // The flow still reports success; the divergence is visible only in the flag.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["lead_linked"], false);
    assert_eq!(scheduling.created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn incomplete_booking_request_never_reaches_the_upstream() {
    let scheduling = Arc::new(RecordingScheduling::default());
    let crm = Arc::new(RecordingCrm::default());
    let app = router_with(scheduling.clone(), crm.clone());

    // A blank slot id slips past deserialization but not the defensive
    // re-validation in the orchestrator.
    let response = app
        .clone()
        .oneshot(post_json(
            "/scheduling/book",
            json!({
                "inspection_type_id": "roof",
                "slot": {
                    "slot_id": "",
                    "start_time": "2024-06-10T13:00:00Z",
                    "end_time": "2024-06-10T14:00:00Z",
                    "date": "2024-06-10"
                },
                "will_someone_be_present": "yes"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing presence is a deserialization failure, also before any write.
    let response = app
        .oneshot(post_json(
            "/scheduling/book",
            json!({
                "inspection_type_id": "roof",
                "slot": {
                    "slot_id": "s1",
                    "start_time": "2024-06-10T13:00:00Z",
                    "end_time": "2024-06-10T14:00:00Z",
                    "date": "2024-06-10"
                }
            }),
        ))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::OK);
    assert!(scheduling.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reschedule_flow_end_to_end() {
    let scheduling = Arc::new(RecordingScheduling::default());
    let crm = Arc::new(RecordingCrm::default());
    let app = router_with(scheduling.clone(), crm.clone());

    let response = app
        .oneshot(post_json(
            "/scheduling/reschedule",
            json!({
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
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    // The response carries the canonical re-fetched inspection.
    assert_eq!(body["inspection"]["id"], "i1");
    assert_eq!(body["inspection"]["booking"]["id"], "b2");

    // One reschedule POST with the old booking id and the new slot ids...
    let rescheduled = scheduling.rescheduled.lock().unwrap();
    assert_eq!(rescheduled.len(), 1);
    assert_eq!(rescheduled[0].booking_id, "b1");
    assert_eq!(rescheduled[0].new_time_slot_id, "s2");
    assert_eq!(
        rescheduled[0].new_date_of_inspection,
        "2024-06-12".parse::<chrono::NaiveDate>().unwrap()
    );
    // ...followed by a refetch of the inspection.
    assert_eq!(
        crm.inspection_fetches.lock().unwrap().as_slice(),
        &["i1".to_string()]
    );
}

#[tokio::test]
async fn reschedule_without_a_reason_is_refused() {
    let scheduling = Arc::new(RecordingScheduling::default());
    let crm = Arc::new(RecordingCrm::default());
    let app = router_with(scheduling.clone(), crm.clone());

    let response = app
        .oneshot(post_json(
            "/scheduling/reschedule",
            json!({
                "booking_id": "b1",
                "inspection_id": "i1",
                "new_slot": {
                    "slot_id": "s2",
                    "start_time": "2024-06-12T09:00:00Z",
                    "end_time": "2024-06-12T10:00:00Z",
                    "date": "2024-06-12"
                },
                "will_someone_be_present": "yes",
                "reason": "   ",
                "confirmed": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(scheduling.rescheduled.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancel_needs_the_confirmation_step() {
    let scheduling = Arc::new(RecordingScheduling::default());
    let crm = Arc::new(RecordingCrm::default());
    let app = router_with(scheduling.clone(), crm.clone());

    // Reason present, but the confirmation dialog was never answered.
    let response = app
        .clone()
        .oneshot(post_json(
            "/scheduling/cancel",
            json!({
                "inspection_id": "i1",
                "booking_id": "b1",
                "reason": "customer requested"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
    assert!(scheduling.cancelled.lock().unwrap().is_empty());

    // Confirmed: the cancellation goes through.
    let response = app
        .oneshot(post_json(
            "/scheduling/cancel",
            json!({
                "inspection_id": "i1",
                "booking_id": "b1",
                "reason": "customer requested",
                "confirmed": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled = scheduling.cancelled.lock().unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].reason, "customer requested");
}

#[tokio::test]
async fn availability_failure_surfaces_as_no_slots() {
    // A scheduling service whose fetch always fails.
    struct FailingScheduling;
    impl roofline_common::services::SchedulingService for FailingScheduling {
        type Error = roofline_common::services::BoxedError;

        fn fetch_available_slots(
            &self,
            _query: roofline_common::services::SlotQuery,
        ) -> roofline_common::services::BoxFuture<
            '_,
            Vec<roofline_common::services::TimeSlot>,
            Self::Error,
        > {
            Box::pin(async {
                Err(roofline_common::services::BoxedError(Box::new(
                    std::io::Error::other("upstream exploded"),
                )))
            })
        }

        fn create_booking(
            &self,
            _request: roofline_common::services::CreateBookingRequest,
        ) -> roofline_common::services::BoxFuture<
            '_,
            roofline_common::services::BookingRecord,
            Self::Error,
        > {
            unimplemented!("not exercised")
        }

        fn cancel_booking(
            &self,
            _request: roofline_common::services::CancelBookingRequest,
        ) -> roofline_common::services::BoxFuture<'_, (), Self::Error> {
            unimplemented!("not exercised")
        }

        fn reschedule_booking(
            &self,
            _request: roofline_common::services::RescheduleBookingRequest,
        ) -> roofline_common::services::BoxFuture<
            '_,
            roofline_common::services::BookingRecord,
            Self::Error,
        > {
            unimplemented!("not exercised")
        }
    }

    let app = routes(
        test_config(),
        Arc::new(FailingScheduling),
        Arc::new(RecordingCrm::default()),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/scheduling/availability")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The view never crashes; the failure reads as an empty calendar.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["days"], json!([]));
}
