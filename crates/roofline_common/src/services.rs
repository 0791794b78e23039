// --- File: crates/roofline_common/src/services.rs ---
//! Service abstractions for the upstream CRM API.
//!
//! This module provides trait definitions for the external services used by the
//! application. These traits allow for dependency injection and easier testing by
//! decoupling the workflow logic from specific implementations of the upstream
//! scheduling and record endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for inspection scheduling operations against the upstream CRM API.
///
/// This trait defines the operations the booking workflow performs: fetching
/// bookable slots, creating a booking, cancelling and rescheduling.
pub trait SchedulingService: Send + Sync {
    /// Error type returned by scheduling operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the bookable time slots matching the query.
    fn fetch_available_slots(
        &self,
        query: SlotQuery,
    ) -> BoxFuture<'_, Vec<TimeSlot>, Self::Error>;

    /// Create an inspection booking.
    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> BoxFuture<'_, BookingRecord, Self::Error>;

    /// Cancel an existing inspection booking.
    fn cancel_booking(&self, request: CancelBookingRequest) -> BoxFuture<'_, (), Self::Error>;

    /// Move an existing booking onto a new slot. The upstream produces a new
    /// booking record; the old one is superseded.
    fn reschedule_booking(
        &self,
        request: RescheduleBookingRequest,
    ) -> BoxFuture<'_, BookingRecord, Self::Error>;
}

/// A trait for CRM record operations the booking workflow depends on.
///
/// The full record layer lives in the CRM client crate; this trait carries only
/// what the orchestrators need, so they can be tested against fakes.
pub trait CrmService: Send + Sync {
    /// Error type returned by CRM record operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a lead record.
    fn get_lead(&self, lead_id: &str) -> BoxFuture<'_, Lead, Self::Error>;

    /// Attach a booking id to its parent lead record.
    fn link_booking_to_lead(
        &self,
        lead_id: &str,
        booking_id: &str,
    ) -> BoxFuture<'_, (), Self::Error>;

    /// Fetch an inspection record, joined with its booking when one exists.
    fn get_inspection(&self, inspection_id: &str) -> BoxFuture<'_, Inspection, Self::Error>;
}

/// A factory for creating service instances.
///
/// This trait provides methods for creating instances of the upstream services.
/// It's used by the application to get access to the services it needs.
pub trait ServiceFactory: Send + Sync {
    /// Get a scheduling service instance.
    fn scheduling_service(&self) -> Option<Arc<dyn SchedulingService<Error = BoxedError>>>;

    /// Get a CRM record service instance.
    fn crm_service(&self) -> Option<Arc<dyn CrmService<Error = BoxedError>>>;
}

/// Whether someone will be present at the property during the inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Presence {
    Yes,
    No,
    Maybe,
}

/// Lifecycle status of an inspection booking as reported by the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
    #[serde(other)]
    Unknown,
}

/// A bookable time interval for an inspection.
///
/// Produced by the availability endpoint; immutable from this side. Several
/// records may describe the same logical interval; identity for display is the
/// `(start_time, end_time)` pair within a date, not `slot_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeSlot {
    /// Upstream identifier of the slot record.
    pub slot_id: String,
    /// Start of the interval.
    pub start_time: DateTime<Utc>,
    /// End of the interval.
    pub end_time: DateTime<Utc>,
    /// Calendar date the interval belongs to.
    pub date: NaiveDate,
}

/// Query filter for the availability endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotQuery {
    pub location_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Payload for creating an inspection booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBookingRequest {
    /// Parent lead to link the booking back onto, when the flow was entered
    /// from a lead record.
    pub lead_id: Option<String>,
    pub property_id: Option<String>,
    pub inspection_type_id: String,
    pub location_id: Option<String>,
    /// Calendar date of the inspection, derived from the chosen slot.
    pub date_of_inspection: NaiveDate,
    /// Identifier of the chosen slot.
    pub time_slot_id: String,
    pub will_someone_be_present: Presence,
}

/// Payload for cancelling a booking. A free-text reason is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelBookingRequest {
    pub inspection_id: String,
    pub booking_id: String,
    pub reason: String,
}

/// Payload for rescheduling a booking onto a new slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RescheduleBookingRequest {
    /// Serialized as `inspection_booking_id`, the field name the upstream
    /// reschedule endpoint expects.
    #[serde(rename = "inspection_booking_id")]
    pub booking_id: String,
    pub inspection_id: String,
    pub new_date_of_inspection: NaiveDate,
    pub new_time_slot_id: String,
    pub will_someone_be_present: Option<Presence>,
    pub reason: String,
}

/// A server-acknowledged inspection booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingRecord {
    pub id: String,
    pub date_of_inspection: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_status: BookingStatus,
    pub will_someone_be_present: Option<Presence>,
    pub time_slot_id: Option<String>,
}

/// A sales-intake record that an inspection booking may be linked back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Lead {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub property_id: Option<String>,
    /// Foreign id of the booking attached by the link-back step. `None` when
    /// no booking exists yet, or when a booking succeeded but the link-back
    /// failed (observable "booked but unlinked" state).
    pub inspection_booking_id: Option<String>,
}

/// An inspection record, read-mostly on this side, enriched for display with
/// its joined booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Inspection {
    pub id: String,
    pub lead_id: Option<String>,
    pub property_id: Option<String>,
    pub inspection_type_id: Option<String>,
    pub inspector_id: Option<String>,
    pub booking: Option<BookingRecord>,
}
