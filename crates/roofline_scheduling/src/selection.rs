// --- File: crates/roofline_scheduling/src/selection.rs ---
//! The slot selection state machine.
//!
//! Tracks a pending (unconfirmed) date/time/type/presence selection distinct
//! from the confirmed booking. Submission is reachable only when every field
//! is set; cancelling restores whatever state existed when the flow opened;
//! a failed submit leaves the pending selection untouched so the user can
//! retry without re-entering data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roofline_common::services::{BookingRecord, Presence, TimeSlot};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selected slot belongs to {slot_date}, not the selected date {selected_date}")]
    SlotDateMismatch {
        slot_date: NaiveDate,
        selected_date: NaiveDate,
    },
    #[error("a date must be selected before a time")]
    NoDateSelected,
    #[error("selection is not complete")]
    NotReady,
    #[error("a submission is already in flight")]
    AlreadySubmitting,
}

/// The user's in-progress, unsubmitted choice. Never persisted; promoted to a
/// booking request only through a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PendingSelection {
    pub date: Option<NaiveDate>,
    pub slot: Option<TimeSlot>,
    pub inspection_type_id: Option<String>,
    pub presence: Option<Presence>,
}

impl PendingSelection {
    /// All four fields a booking needs.
    pub fn is_complete(&self) -> bool {
        self.date.is_some()
            && self.slot.is_some()
            && self.inspection_type_id.is_some()
            && self.presence.is_some()
    }
}

/// Where the flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SelectionPhase {
    /// No flow open, no existing booking.
    Idle,
    /// Flow open, nothing chosen yet.
    Browsing,
    DateSelected,
    TimeSelected,
    ReadyToSubmit,
    Submitting,
    Confirmed,
    Failed,
}

/// The selection flow: pending state, derived phase, and the snapshot taken
/// when the flow opened (restored on cancel).
#[derive(Debug, Clone)]
pub struct SelectionFlow {
    phase: SelectionPhase,
    pending: PendingSelection,
    opened_with: PendingSelection,
    confirmed: Option<BookingRecord>,
}

impl SelectionFlow {
    /// Opens a flow, seeding the pending selection from the current confirmed
    /// booking when one exists.
    pub fn open(existing: Option<&BookingRecord>, inspection_type_id: Option<String>) -> Self {
        let pending = PendingSelection {
            date: existing.map(|b| b.date_of_inspection),
            slot: None,
            inspection_type_id,
            presence: existing.and_then(|b| b.will_someone_be_present),
        };
        let mut flow = Self {
            phase: SelectionPhase::Browsing,
            pending: pending.clone(),
            opened_with: pending,
            confirmed: existing.cloned(),
        };
        flow.recompute_phase();
        flow
    }

    pub fn idle() -> Self {
        Self {
            phase: SelectionPhase::Idle,
            pending: PendingSelection::default(),
            opened_with: PendingSelection::default(),
            confirmed: None,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn pending(&self) -> &PendingSelection {
        &self.pending
    }

    pub fn confirmed(&self) -> Option<&BookingRecord> {
        self.confirmed.as_ref()
    }

    /// Selects a date. Choosing a different date invalidates any chosen slot,
    /// since a time is only valid relative to its date.
    pub fn select_date(&mut self, date: NaiveDate) {
        if self.pending.date != Some(date) {
            self.pending.slot = None;
        }
        self.pending.date = Some(date);
        self.recompute_phase();
    }

    /// Selects a slot within the currently selected date.
    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), SelectionError> {
        let selected_date = self.pending.date.ok_or(SelectionError::NoDateSelected)?;
        if slot.date != selected_date {
            return Err(SelectionError::SlotDateMismatch {
                slot_date: slot.date,
                selected_date,
            });
        }
        self.pending.slot = Some(slot);
        self.recompute_phase();
        Ok(())
    }

    pub fn set_inspection_type(&mut self, inspection_type_id: String) {
        self.pending.inspection_type_id = Some(inspection_type_id);
        self.recompute_phase();
    }

    pub fn set_presence(&mut self, presence: Presence) {
        self.pending.presence = Some(presence);
        self.recompute_phase();
    }

    /// The book/reschedule action is enabled exactly here.
    pub fn ready_to_submit(&self) -> bool {
        self.phase == SelectionPhase::ReadyToSubmit
    }

    /// Moves into `Submitting`. Only reachable from `ReadyToSubmit`.
    pub fn begin_submit(&mut self) -> Result<(), SelectionError> {
        match self.phase {
            SelectionPhase::ReadyToSubmit => {
                self.phase = SelectionPhase::Submitting;
                Ok(())
            }
            SelectionPhase::Submitting => Err(SelectionError::AlreadySubmitting),
            _ => Err(SelectionError::NotReady),
        }
    }

    /// Promotes the pending selection into the confirmed booking. The only
    /// path by which pending state reaches confirmed state.
    pub fn complete(&mut self, booking: BookingRecord) {
        self.confirmed = Some(booking);
        self.phase = SelectionPhase::Confirmed;
    }

    /// Marks the in-flight submit as failed. The pending selection is left
    /// untouched so a retry needs no re-entry.
    pub fn fail(&mut self) {
        self.phase = SelectionPhase::Failed;
    }

    /// Returns from `Failed` to an editable state for a manual retry.
    pub fn retry(&mut self) {
        if self.phase == SelectionPhase::Failed {
            self.recompute_phase();
        }
    }

    /// Abandons the flow: pending state reverts to the snapshot taken when the
    /// flow opened, leaving the confirmed booking unchanged.
    pub fn cancel(&mut self) {
        self.pending = self.opened_with.clone();
        self.phase = SelectionPhase::Browsing;
        self.recompute_phase();
    }

    fn recompute_phase(&mut self) {
        // In-flight and terminal phases are explicit; everything else is
        // derived from pending completeness.
        if matches!(
            self.phase,
            SelectionPhase::Submitting | SelectionPhase::Confirmed
        ) {
            return;
        }
        self.phase = if self.pending.is_complete() {
            SelectionPhase::ReadyToSubmit
        } else if self.pending.slot.is_some() {
            SelectionPhase::TimeSelected
        } else if self.pending.date.is_some() {
            SelectionPhase::DateSelected
        } else {
            SelectionPhase::Browsing
        };
    }
}
