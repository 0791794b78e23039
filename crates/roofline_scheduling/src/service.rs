// --- File: crates/roofline_scheduling/src/service.rs ---
//! Scheduling service implementation over the upstream CRM API.
//!
//! This module provides an implementation of the SchedulingService trait for
//! the CRM's inspection-booking endpoints.
//!
//! The availability endpoint historically returned several shapes (bare array,
//! `{slots: [...]}`, `{data: [...]}`); this implementation holds the upstream
//! to one canonical contract, `{"slots": [...]}`, and treats any deviation as
//! a hard decode error with the raw payload logged for diagnosis. Guessing at
//! the shape in production hid real contract drift.

use std::sync::Arc;

use roofline_common::services::{
    BookingRecord, BoxFuture, CancelBookingRequest, CreateBookingRequest,
    RescheduleBookingRequest, SchedulingService, SlotQuery, TimeSlot,
};
use roofline_crm::{ApiGroup, CrmClient, CrmError};
use tracing::error;
use uuid::Uuid;

/// Scheduling service backed by the upstream CRM API.
pub struct CrmSchedulingService {
    client: Arc<CrmClient>,
}

impl CrmSchedulingService {
    /// Create a new scheduling service.
    pub fn new(client: Arc<CrmClient>) -> Self {
        Self { client }
    }

    fn availability_path(query: &SlotQuery) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(location_id) = &query.location_id {
            params.push(format!("location_id={}", location_id));
        }
        if let Some(date) = &query.date {
            params.push(format!("date={}", date));
        }
        if let Some(start_date) = &query.start_date {
            params.push(format!("start_date={}", start_date));
        }
        if let Some(end_date) = &query.end_date {
            params.push(format!("end_date={}", end_date));
        }
        if params.is_empty() {
            "inspection_booking/available_slots".to_string()
        } else {
            format!("inspection_booking/available_slots?{}", params.join("&"))
        }
    }

    /// Decodes the canonical availability envelope. Anything that is not an
    /// object with a `slots` array of well-formed slot records is an error.
    fn decode_slots(payload: serde_json::Value) -> Result<Vec<TimeSlot>, CrmError> {
        let Some(slots_value) = payload.get("slots").filter(|v| v.is_array()) else {
            error!(
                "availability response did not match the canonical contract: {}",
                payload
            );
            return Err(CrmError::DecodeError(
                "availability response missing `slots` array".to_string(),
            ));
        };
        serde_json::from_value::<Vec<TimeSlot>>(slots_value.clone()).map_err(|e| {
            error!("malformed slot record in availability response: {}", payload);
            CrmError::DecodeError(format!("malformed slot record: {e}"))
        })
    }
}

impl SchedulingService for CrmSchedulingService {
    type Error = CrmError;

    fn fetch_available_slots(&self, query: SlotQuery) -> BoxFuture<'_, Vec<TimeSlot>, Self::Error> {
        let client = self.client.clone();
        Box::pin(async move {
            let payload: serde_json::Value = client
                .get_json(ApiGroup::V2, &Self::availability_path(&query))
                .await?;
            Self::decode_slots(payload)
        })
    }

    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> BoxFuture<'_, BookingRecord, Self::Error> {
        let client = self.client.clone();
        Box::pin(async move {
            // Attach a client-generated reference so a retried POST can be
            // traced to its first attempt in the upstream logs.
            let mut body = serde_json::to_value(&request)
                .map_err(|e| CrmError::DecodeError(e.to_string()))?;
            if let Some(map) = body.as_object_mut() {
                map.insert(
                    "client_reference_id".to_string(),
                    serde_json::Value::String(format!("roofline-{}", Uuid::new_v4())),
                );
            }
            client
                .post_json(ApiGroup::V2, "inspection_booking", &body)
                .await
        })
    }

    fn cancel_booking(&self, request: CancelBookingRequest) -> BoxFuture<'_, (), Self::Error> {
        let client = self.client.clone();
        Box::pin(async move {
            let _: serde_json::Value = client
                .post_json(ApiGroup::V2, "inspection_booking/cancel", &request)
                .await?;
            Ok(())
        })
    }

    fn reschedule_booking(
        &self,
        request: RescheduleBookingRequest,
    ) -> BoxFuture<'_, BookingRecord, Self::Error> {
        let client = self.client.clone();
        Box::pin(async move {
            client
                .post_json(ApiGroup::V2, "inspection_booking/reschedule", &request)
                .await
        })
    }
}
