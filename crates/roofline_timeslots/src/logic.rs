// --- File: crates/roofline_timeslots/src/logic.rs ---

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeSlotsError {
    #[error("weekday index {0} is out of range (0-6)")]
    InvalidWeekday(u8),
    #[error("weekday index {0} appears more than once")]
    DuplicateWeekday(u8),
}

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum RepeatCadence {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum RuleStatus {
    Active,
    Inactive,
}

/// A template describing which weekdays/hours are generally available, as
/// opposed to one concrete booked slot.
///
/// `days` holds weekday indices 0..=6 (Sunday = 0), deduplicated. Start and
/// end times are independent free-text picks from the half-hour option list;
/// no `end > start` ordering is enforced here, the upstream owns that rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecurringSlotRule {
    pub id: String,
    pub days: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
    pub repeat: RepeatCadence,
    pub status: RuleStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating a rule. New rules always start from fixed defaults; the
/// user shapes them afterwards through the auto-saving editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewRule {
    pub days: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
    pub repeat: RepeatCadence,
    pub status: RuleStatus,
}

impl NewRule {
    pub fn defaults(start_time: &str, end_time: &str) -> Self {
        Self {
            days: Vec::new(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            repeat: RepeatCadence::Weekly,
            status: RuleStatus::Active,
        }
    }
}

/// Partial update for a rule. Only set fields serialize, so every edit inside
/// one debounce window collapses into a single PATCH body (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatCadence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RuleStatus>,
}

impl RulePatch {
    pub fn is_empty(&self) -> bool {
        self.days.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.repeat.is_none()
            && self.status.is_none()
    }
}

/// Validates a weekday multi-select: indices 0..=6, no duplicates.
pub fn validate_days(days: &[u8]) -> Result<(), TimeSlotsError> {
    let mut seen = [false; 7];
    for &day in days {
        if day > 6 {
            return Err(TimeSlotsError::InvalidWeekday(day));
        }
        if seen[day as usize] {
            return Err(TimeSlotsError::DuplicateWeekday(day));
        }
        seen[day as usize] = true;
    }
    Ok(())
}

/// One entry of the time picker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeOption {
    /// 24-hour wire value, e.g. "09:30".
    pub value: String,
    /// 12-hour display label, e.g. "9:30 AM".
    pub label: String,
}

/// The free-choice time list: half-hour granularity spanning the full day.
pub fn half_hour_options() -> Vec<TimeOption> {
    let mut options = Vec::with_capacity(48);
    for half_hour in 0..48 {
        let hour = half_hour / 2;
        let minute = if half_hour % 2 == 0 { 0 } else { 30 };
        let meridiem = if hour < 12 { "AM" } else { "PM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        options.push(TimeOption {
            value: format!("{:02}:{:02}", hour, minute),
            label: format!("{}:{:02} {}", display_hour, minute, meridiem),
        });
    }
    options
}
