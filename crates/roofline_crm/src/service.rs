// --- File: crates/roofline_crm/src/service.rs ---
//! CRM record service implementation.
//!
//! This module provides an implementation of the CrmService trait over the
//! upstream CRM API client, so the booking orchestrators can depend on the
//! trait instead of the concrete client.

use std::sync::Arc;

use roofline_common::services::{BoxFuture, CrmService, Inspection, Lead};

use crate::client::{CrmClient, CrmError};

/// CRM record service backed by the upstream API client.
pub struct CrmRecordService {
    client: Arc<CrmClient>,
}

impl CrmRecordService {
    /// Create a new CRM record service.
    pub fn new(client: Arc<CrmClient>) -> Self {
        Self { client }
    }
}

impl CrmService for CrmRecordService {
    type Error = CrmError;

    fn get_lead(&self, lead_id: &str) -> BoxFuture<'_, Lead, Self::Error> {
        let lead_id = lead_id.to_string();
        let client = self.client.clone();
        Box::pin(async move { client.get_lead(&lead_id).await })
    }

    fn link_booking_to_lead(
        &self,
        lead_id: &str,
        booking_id: &str,
    ) -> BoxFuture<'_, (), Self::Error> {
        let lead_id = lead_id.to_string();
        let booking_id = booking_id.to_string();
        let client = self.client.clone();
        Box::pin(async move {
            client.link_booking_to_lead(&lead_id, &booking_id).await?;
            Ok(())
        })
    }

    fn get_inspection(&self, inspection_id: &str) -> BoxFuture<'_, Inspection, Self::Error> {
        let inspection_id = inspection_id.to_string();
        let client = self.client.clone();
        Box::pin(async move { client.get_inspection(&inspection_id).await })
    }
}
