// --- File: crates/roofline_timeslots/src/editor.rs ---
//! The auto-saving rule editor.
//!
//! Every field edit schedules a save after a debounce delay; a newer edit
//! inside the window cancels and restarts the timer, so exactly one PATCH
//! fires carrying the latest combined state. Saves are wired up only once the
//! editor has reached `Ready`: populating the form while a rule loads can
//! never trigger a save of the data that was just loaded.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::logic::{
    validate_days, NewRule, RecurringSlotRule, RepeatCadence, RulePatch, RuleStatus,
    TimeSlotsError,
};
use crate::store::RuleStore;

/// Save wiring state. Field population during `Loading` mutates the form
/// without scheduling saves; the transition to `Ready` arms them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Loading,
    Ready,
}

/// Editor session for one selected rule.
pub struct RuleEditor<S: RuleStore> {
    store: Arc<S>,
    debounce: Duration,
    defaults: NewRule,
    phase: EditorPhase,
    current: Option<RecurringSlotRule>,
    dirty: RulePatch,
    pending_save: Option<JoinHandle<()>>,
}

impl<S: RuleStore> RuleEditor<S> {
    pub fn new(store: Arc<S>, debounce: Duration, defaults: NewRule) -> Self {
        Self {
            store,
            debounce,
            defaults,
            phase: EditorPhase::Loading,
            current: None,
            dirty: RulePatch::default(),
            pending_save: None,
        }
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&RecurringSlotRule> {
        self.current.as_ref()
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Starts populating the editor from a rule. Any in-flight save for the
    /// previous rule is dropped; saves stay unwired until `finish_loading`.
    pub fn begin_loading(&mut self, rule: RecurringSlotRule) {
        self.abort_pending();
        self.phase = EditorPhase::Loading;
        self.dirty = RulePatch::default();
        self.current = Some(rule);
    }

    /// Arms auto-save once population is done. Fields touched during
    /// population are not user edits and are discarded from the dirty set.
    pub fn finish_loading(&mut self) {
        self.dirty = RulePatch::default();
        self.phase = EditorPhase::Ready;
    }

    /// Convenience for the common load path.
    pub fn load(&mut self, rule: RecurringSlotRule) {
        self.begin_loading(rule);
        self.finish_loading();
    }

    /// Replaces the weekday multi-select.
    pub fn set_days(&mut self, days: Vec<u8>) -> Result<(), TimeSlotsError> {
        validate_days(&days)?;
        self.apply(|rule, dirty| {
            rule.days = days.clone();
            dirty.days = Some(days);
        });
        Ok(())
    }

    /// Toggles one weekday in or out of the selection.
    pub fn toggle_day(&mut self, day: u8) -> Result<(), TimeSlotsError> {
        if day > 6 {
            return Err(TimeSlotsError::InvalidWeekday(day));
        }
        let mut days = self
            .current
            .as_ref()
            .map(|r| r.days.clone())
            .unwrap_or_default();
        if let Some(pos) = days.iter().position(|&d| d == day) {
            days.remove(pos);
        } else {
            days.push(day);
        }
        self.set_days(days)
    }

    pub fn set_start_time(&mut self, start_time: String) {
        self.apply(|rule, dirty| {
            rule.start_time = start_time.clone();
            dirty.start_time = Some(start_time);
        });
    }

    pub fn set_end_time(&mut self, end_time: String) {
        self.apply(|rule, dirty| {
            rule.end_time = end_time.clone();
            dirty.end_time = Some(end_time);
        });
    }

    pub fn set_repeat(&mut self, repeat: RepeatCadence) {
        self.apply(|rule, dirty| {
            rule.repeat = repeat;
            dirty.repeat = Some(repeat);
        });
    }

    pub fn set_status(&mut self, status: RuleStatus) {
        self.apply(|rule, dirty| {
            rule.status = status;
            dirty.status = Some(status);
        });
    }

    fn apply(&mut self, edit: impl FnOnce(&mut RecurringSlotRule, &mut RulePatch)) {
        let Some(rule) = self.current.as_mut() else {
            return;
        };
        edit(rule, &mut self.dirty);
        self.schedule_save();
    }

    /// (Re)starts the debounce timer with the accumulated dirty fields.
    fn schedule_save(&mut self) {
        if self.phase != EditorPhase::Ready {
            // Still populating; nothing is wired to save yet.
            return;
        }
        let Some(id) = self.current.as_ref().map(|r| r.id.clone()) else {
            return;
        };
        if self.dirty.is_empty() {
            return;
        }

        self.abort_pending();

        let store = self.store.clone();
        let patch = self.dirty.clone();
        let delay = self.debounce;
        debug!("auto-save for rule {} scheduled in {:?}", id, delay);
        self.pending_save = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match store.update(&id, patch).await {
                Ok(_) => info!("auto-saved rule {}", id),
                Err(e) => error!("auto-save for rule {} failed: {}", id, e),
            }
        }));
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending_save.take() {
            handle.abort();
        }
    }

    /// Creates a rule from the fixed defaults, re-fetches the full list and
    /// selects the created entry.
    pub async fn create_rule(&mut self) -> Result<RecurringSlotRule, S::Error> {
        let created = self.store.create(self.defaults.clone()).await?;
        let list = self.store.list().await?;
        let selected = select_created(&created.id, list).unwrap_or(created);
        self.load(selected.clone());
        Ok(selected)
    }

    /// Deletes a rule immediately. Deliberately not gated behind a
    /// confirmation step, unlike cancel/reschedule.
    pub async fn delete_rule(&mut self, id: &str) -> Result<(), S::Error> {
        if self.current.as_ref().map(|r| r.id.as_str()) == Some(id) {
            self.abort_pending();
            self.current = None;
            self.dirty = RulePatch::default();
        }
        self.store.delete(id).await
    }
}

impl<S: RuleStore> Drop for RuleEditor<S> {
    fn drop(&mut self) {
        // A save scheduled for an abandoned editor must never fire.
        self.abort_pending();
    }
}

/// Picks the created entry out of the re-fetched list by id, falling back to
/// the last entry. The fallback assumes the upstream appends new records;
/// that ordering is an observed behavior, not a guaranteed contract.
pub fn select_created(
    created_id: &str,
    list: Vec<RecurringSlotRule>,
) -> Option<RecurringSlotRule> {
    list.iter()
        .find(|r| r.id == created_id)
        .cloned()
        .or_else(|| list.last().cloned())
}
