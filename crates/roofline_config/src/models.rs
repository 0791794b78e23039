// --- File: crates/roofline_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Upstream CRM API Config ---
// Holds the three logical base URLs of the backend-as-a-service. The bearer
// token is a secret, loaded from env via the "secret_from_env" marker
// (CRM_API__API_TOKEN) or directly through ROOFLINE__CRM_API__API_TOKEN.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CrmApiConfig {
    /// Core API group, e.g. https://x8ki.xano.io/api:main
    pub base_url: String,
    /// Second-generation endpoints group. Falls back to `base_url` when unset.
    pub v2_base_url: Option<String>,
    /// Contacts endpoints group. Falls back to `base_url` when unset.
    pub contacts_base_url: Option<String>,
    /// Bearer token attached to every call.
    pub api_token: Option<String>,
    /// Default location the dashboard operates on.
    pub location_id: Option<String>,
}

// --- Inspection Scheduling Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA zone the business operates in; slot labels render in this zone.
    pub time_zone: Option<String>,
    /// Inspection type preselected when a flow opens without one.
    pub default_inspection_type_id: Option<String>,
}

// --- Recurring Time-Slot Rules Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TimeSlotsConfig {
    /// Delay between the last field edit and the auto-save request.
    pub autosave_debounce_ms: Option<u64>,
    /// Defaults applied to newly created rules.
    pub default_start_time: Option<String>,
    pub default_end_time: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_scheduling: bool,
    #[serde(default)]
    pub use_timeslots: bool,
    #[serde(default)]
    pub use_crm: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub crm_api: Option<CrmApiConfig>,
    #[serde(default)]
    pub scheduling: Option<SchedulingConfig>,
    #[serde(default)]
    pub timeslots: Option<TimeSlotsConfig>,
}
