// --- File: crates/roofline_scheduling/src/replace.rs ---
//! The cancel/reschedule flow for an existing booking.
//!
//! Entered only when a confirmed booking exists. The two actions are mutually
//! exclusive, a free-text reason is required for either, and the destructive
//! submit sits behind an explicit confirmation step: the reason form never
//! submits directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roofline_common::services::{BookingRecord, CancelBookingRequest, RescheduleBookingRequest};

use crate::logic::presence_default_from;
use crate::selection::SelectionFlow;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReplaceError {
    #[error("choose either cancel or reschedule first")]
    NoActionChosen,
    #[error("a reason is required")]
    ReasonRequired,
    #[error("a new date and time must be selected to reschedule")]
    SelectionIncomplete,
    #[error("the action has not been confirmed")]
    NotAwaitingConfirmation,
    #[error("a submission is already in flight")]
    AlreadySubmitting,
}

/// Which destructive action the user picked in the segmented control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ReplaceAction {
    Cancel,
    Reschedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceStage {
    /// Filling in action, reason and (for reschedule) the new slot.
    Choosing,
    /// The generic yes/no confirmation dialog is up.
    AwaitingConfirmation,
    Submitting,
    Completed,
}

/// The submit payload produced once the flow is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplaceCommand {
    Cancel(CancelBookingRequest),
    Reschedule(RescheduleBookingRequest),
}

/// State for replacing (cancelling or rescheduling) an existing booking.
#[derive(Debug, Clone)]
pub struct ReplaceFlow {
    booking_id: String,
    inspection_id: String,
    action: Option<ReplaceAction>,
    reason: String,
    selection: SelectionFlow,
    stage: ReplaceStage,
}

impl ReplaceFlow {
    /// Opens the flow for an existing booking, re-seeding the presence default
    /// and the date from it.
    pub fn open(booking: &BookingRecord, inspection_id: &str) -> Self {
        let mut selection = SelectionFlow::open(Some(booking), None);
        if let Some(presence) = presence_default_from(booking) {
            selection.set_presence(presence);
        }
        Self {
            booking_id: booking.id.clone(),
            inspection_id: inspection_id.to_string(),
            action: None,
            reason: String::new(),
            selection,
            stage: ReplaceStage::Choosing,
        }
    }

    /// Opens the flow when only the record ids are at hand (no booking body to
    /// seed defaults from).
    pub fn from_ids(booking_id: &str, inspection_id: &str) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            inspection_id: inspection_id.to_string(),
            action: None,
            reason: String::new(),
            selection: SelectionFlow::idle(),
            stage: ReplaceStage::Choosing,
        }
    }

    pub fn stage(&self) -> ReplaceStage {
        self.stage
    }

    pub fn action(&self) -> Option<ReplaceAction> {
        self.action
    }

    /// Switches between cancel and reschedule; the two are mutually exclusive.
    pub fn choose_action(&mut self, action: ReplaceAction) {
        self.action = Some(action);
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    /// Mutable access to the slot selection used by the reschedule path.
    pub fn selection_mut(&mut self) -> &mut SelectionFlow {
        &mut self.selection
    }

    pub fn selection(&self) -> &SelectionFlow {
        &self.selection
    }

    /// The reschedule path needs a new date, a new slot and a presence answer.
    /// The inspection type stays whatever the existing inspection has, so it
    /// is not part of this check.
    fn reschedule_selection_complete(&self) -> bool {
        let pending = self.selection.pending();
        pending.date.is_some() && pending.slot.is_some() && pending.presence.is_some()
    }

    /// Whether the submit control is enabled. A blank or whitespace-only
    /// reason disables it regardless of everything else; reschedule further
    /// requires a complete new selection.
    pub fn can_submit(&self) -> bool {
        if self.reason.trim().is_empty() {
            return false;
        }
        match self.action {
            None => false,
            Some(ReplaceAction::Cancel) => true,
            Some(ReplaceAction::Reschedule) => self.reschedule_selection_complete(),
        }
    }

    /// Raises the confirmation dialog. Refused while the form is incomplete.
    pub fn request_confirmation(&mut self) -> Result<(), ReplaceError> {
        if self.stage == ReplaceStage::Submitting {
            return Err(ReplaceError::AlreadySubmitting);
        }
        match self.action {
            None => return Err(ReplaceError::NoActionChosen),
            Some(ReplaceAction::Cancel) => {
                if self.reason.trim().is_empty() {
                    return Err(ReplaceError::ReasonRequired);
                }
            }
            Some(ReplaceAction::Reschedule) => {
                if self.reason.trim().is_empty() {
                    return Err(ReplaceError::ReasonRequired);
                }
                if !self.reschedule_selection_complete() {
                    return Err(ReplaceError::SelectionIncomplete);
                }
            }
        }
        self.stage = ReplaceStage::AwaitingConfirmation;
        Ok(())
    }

    /// Dismisses the confirmation dialog, back to editing.
    pub fn decline(&mut self) {
        if self.stage == ReplaceStage::AwaitingConfirmation {
            self.stage = ReplaceStage::Choosing;
        }
    }

    /// Confirms the destructive action and produces the submit payload.
    pub fn confirm(&mut self) -> Result<ReplaceCommand, ReplaceError> {
        if self.stage != ReplaceStage::AwaitingConfirmation {
            return Err(ReplaceError::NotAwaitingConfirmation);
        }
        let command = match self.action {
            Some(ReplaceAction::Cancel) => ReplaceCommand::Cancel(CancelBookingRequest {
                inspection_id: self.inspection_id.clone(),
                booking_id: self.booking_id.clone(),
                reason: self.reason.clone(),
            }),
            Some(ReplaceAction::Reschedule) => {
                let pending = self.selection.pending();
                let slot = pending
                    .slot
                    .as_ref()
                    .ok_or(ReplaceError::SelectionIncomplete)?;
                ReplaceCommand::Reschedule(RescheduleBookingRequest {
                    booking_id: self.booking_id.clone(),
                    inspection_id: self.inspection_id.clone(),
                    new_date_of_inspection: slot.date,
                    new_time_slot_id: slot.slot_id.clone(),
                    will_someone_be_present: pending.presence,
                    reason: self.reason.clone(),
                })
            }
            None => return Err(ReplaceError::NoActionChosen),
        };
        self.stage = ReplaceStage::Submitting;
        Ok(command)
    }

    /// Marks the submit as done; on cancel the caller clears its local
    /// confirmed-booking state.
    pub fn complete(&mut self) {
        self.stage = ReplaceStage::Completed;
    }

    /// Marks the submit as failed; the form state stays for a manual retry.
    pub fn fail(&mut self) {
        self.stage = ReplaceStage::Choosing;
    }
}
