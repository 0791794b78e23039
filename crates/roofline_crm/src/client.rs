//! Upstream CRM API client.
//!
//! This module provides the client for the roofing CRM backend-as-a-service.
//! The upstream exposes three logical endpoint groups (core, v2, contacts)
//! distinguished only by path prefix; `CrmClient` routes each call to the
//! right group and attaches the bearer token to every request.
//!
//! Error bodies are parsed for a `message`/`error` field, falling back to the
//! raw text or the HTTP status line, matching how the dashboard surfaces
//! upstream failures inline.

use reqwest::{header, Client, Response, StatusCode};
use roofline_common::http::client::HTTP_CLIENT;
use roofline_common::services::{BookingRecord, Inspection, Lead};
use roofline_config::CrmApiConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{Contact, LeadPatch, Property};

/// Errors that can occur when talking to the upstream CRM API
#[derive(Error, Debug)]
pub enum CrmError {
    /// No bearer token available for the call
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to the CRM API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Non-2xx response from the CRM API
    #[error("CRM API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body did not match the expected record shape
    #[error("Failed to decode CRM response: {0}")]
    DecodeError(String),

    /// Record does not exist upstream
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// The three logical endpoint groups of the upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGroup {
    Core,
    V2,
    Contacts,
}

/// Client for the roofing CRM backend-as-a-service.
///
/// Holds its own authenticated capability (config + token) rather than reading
/// process-global state at each call site, so token handling stays in one place.
pub struct CrmClient {
    client: Client,
    config: CrmApiConfig,
}

impl CrmClient {
    /// Creates a new CRM client with the given configuration, sharing the
    /// process-wide connection pool.
    pub fn new(config: CrmApiConfig) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            config,
        }
    }

    /// Creates a client reusing an existing reqwest `Client`.
    pub fn with_client(client: Client, config: CrmApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CrmApiConfig {
        &self.config
    }

    fn token(&self) -> Result<&str, CrmError> {
        self.config
            .api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CrmError::AuthError("CRM API token is not configured".to_string()))
    }

    /// Resolves the base URL for an endpoint group. The v2 and contacts groups
    /// fall back to the core group when not configured separately.
    fn base_url(&self, group: ApiGroup) -> &str {
        match group {
            ApiGroup::Core => &self.config.base_url,
            ApiGroup::V2 => self
                .config
                .v2_base_url
                .as_deref()
                .unwrap_or(&self.config.base_url),
            ApiGroup::Contacts => self
                .config
                .contacts_base_url
                .as_deref()
                .unwrap_or(&self.config.base_url),
        }
    }

    fn url(&self, group: ApiGroup, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url(group).trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Issues a GET and decodes the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        group: ApiGroup,
        path: &str,
    ) -> Result<T, CrmError> {
        let url = self.url(group, path);
        debug!("CRM GET {}", url);
        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token()?))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Issues a POST with a JSON body and decodes the JSON response into `T`.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        group: ApiGroup,
        path: &str,
        body: &B,
    ) -> Result<T, CrmError> {
        let url = self.url(group, path);
        debug!("CRM POST {}", url);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token()?))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Issues a PATCH with a partial JSON body and decodes the response into `T`.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        group: ApiGroup,
        path: &str,
        body: &B,
    ) -> Result<T, CrmError> {
        let url = self.url(group, path);
        debug!("CRM PATCH {}", url);
        let response = self
            .client
            .patch(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token()?))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Issues a DELETE. The upstream returns an empty body on success.
    pub async fn delete(&self, group: ApiGroup, path: &str) -> Result<(), CrmError> {
        let url = self.url(group, path);
        debug!("CRM DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token()?))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CrmError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let text = response.text().await.unwrap_or_default();
            return Err(CrmError::NotFound(Self::message_from_body(&text, status)));
        }
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }
        let text = response.text().await?;
        // Some mutation endpoints acknowledge with an empty body.
        let text = if text.trim().is_empty() {
            "null".to_string()
        } else {
            text
        };
        serde_json::from_str(&text).map_err(|e| CrmError::DecodeError(format!("{e}: {text}")))
    }

    async fn api_error(response: Response) -> CrmError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        CrmError::ApiError {
            status: status.as_u16(),
            message: Self::message_from_body(&text, status),
        }
    }

    /// Pulls a human-readable message out of an error body: a JSON
    /// `message`/`error` field when present, the raw text otherwise, the HTTP
    /// status line when the body is empty.
    fn message_from_body(text: &str, status: StatusCode) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
            for key in ["message", "error"] {
                if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                    return msg.to_string();
                }
            }
        }
        if text.trim().is_empty() {
            status.to_string()
        } else {
            text.trim().to_string()
        }
    }

    // --- Typed record operations ---

    /// Fetch a lead record.
    pub async fn get_lead(&self, lead_id: &str) -> Result<Lead, CrmError> {
        self.get_json(ApiGroup::Core, &format!("lead/{}", lead_id))
            .await
    }

    /// List leads, optionally filtered by location.
    pub async fn list_leads(&self, location_id: Option<&str>) -> Result<Vec<Lead>, CrmError> {
        let path = match location_id {
            Some(loc) => format!("lead?location_id={}", loc),
            None => "lead".to_string(),
        };
        self.get_json(ApiGroup::Core, &path).await
    }

    /// Apply a partial update to a lead record.
    pub async fn update_lead(&self, lead_id: &str, patch: &LeadPatch) -> Result<Lead, CrmError> {
        self.patch_json(ApiGroup::Core, &format!("lead/{}", lead_id), patch)
            .await
    }

    /// Attach a booking id to its parent lead.
    pub async fn link_booking_to_lead(
        &self,
        lead_id: &str,
        booking_id: &str,
    ) -> Result<Lead, CrmError> {
        let patch = LeadPatch {
            inspection_booking_id: Some(booking_id.to_string()),
            ..LeadPatch::default()
        };
        self.update_lead(lead_id, &patch).await
    }

    /// Fetch an inspection record joined with its booking.
    pub async fn get_inspection(&self, inspection_id: &str) -> Result<Inspection, CrmError> {
        self.get_json(ApiGroup::V2, &format!("inspection/{}", inspection_id))
            .await
    }

    /// List inspections, optionally filtered by location.
    pub async fn list_inspections(
        &self,
        location_id: Option<&str>,
    ) -> Result<Vec<Inspection>, CrmError> {
        let path = match location_id {
            Some(loc) => format!("inspection?location_id={}", loc),
            None => "inspection".to_string(),
        };
        self.get_json(ApiGroup::V2, &path).await
    }

    /// Fetch the booking record attached to an inspection, when one exists.
    pub async fn get_inspection_booking(
        &self,
        inspection_id: &str,
    ) -> Result<Option<BookingRecord>, CrmError> {
        let inspection = self.get_inspection(inspection_id).await?;
        Ok(inspection.booking)
    }

    /// Fetch a contact record.
    pub async fn get_contact(&self, contact_id: &str) -> Result<Contact, CrmError> {
        self.get_json(ApiGroup::Contacts, &format!("contact/{}", contact_id))
            .await
    }

    /// Fetch a property record.
    pub async fn get_property(&self, property_id: &str) -> Result<Property, CrmError> {
        self.get_json(ApiGroup::Core, &format!("property/{}", property_id))
            .await
    }
}
