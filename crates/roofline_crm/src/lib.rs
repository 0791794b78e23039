//! Upstream CRM record layer for Roofline
//!
//! This crate provides the typed client for the roofing CRM backend-as-a-service
//! and a thin HTTP surface over its lead, inspection, contact and property
//! records. The upstream owns every entity; this side holds working copies and
//! reconciles by refetch after mutation.

pub mod client;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;
// Re-export the client and service for the service factory
pub use client::{ApiGroup, CrmClient, CrmError};
pub use service::CrmRecordService;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::CrmApiDoc;
}
