// --- File: crates/roofline_timeslots/src/store.rs ---
//! Persistence seam for recurring rules.
//!
//! The rules live in the upstream CRM; this trait decouples the editor from
//! the concrete client so it can be driven against an in-memory store in tests.

use std::sync::Arc;

use roofline_common::services::BoxFuture;
use roofline_crm::{ApiGroup, CrmClient, CrmError};

use crate::logic::{NewRule, RecurringSlotRule, RulePatch};

/// Storage operations for recurring time-slot rules.
pub trait RuleStore: Send + Sync + 'static {
    /// Error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the full rule list.
    fn list(&self) -> BoxFuture<'_, Vec<RecurringSlotRule>, Self::Error>;

    /// Insert a new rule; the upstream assigns the id.
    fn create(&self, rule: NewRule) -> BoxFuture<'_, RecurringSlotRule, Self::Error>;

    /// Apply a partial update to a rule.
    fn update(&self, id: &str, patch: RulePatch)
        -> BoxFuture<'_, RecurringSlotRule, Self::Error>;

    /// Delete a rule.
    fn delete(&self, id: &str) -> BoxFuture<'_, (), Self::Error>;
}

/// Rule store backed by the upstream CRM API.
pub struct CrmRuleStore {
    client: Arc<CrmClient>,
}

impl CrmRuleStore {
    pub fn new(client: Arc<CrmClient>) -> Self {
        Self { client }
    }
}

impl RuleStore for CrmRuleStore {
    type Error = CrmError;

    fn list(&self) -> BoxFuture<'_, Vec<RecurringSlotRule>, Self::Error> {
        let client = self.client.clone();
        Box::pin(async move { client.get_json(ApiGroup::Core, "recurring_time_slot").await })
    }

    fn create(&self, rule: NewRule) -> BoxFuture<'_, RecurringSlotRule, Self::Error> {
        let client = self.client.clone();
        Box::pin(async move {
            client
                .post_json(ApiGroup::Core, "recurring_time_slot", &rule)
                .await
        })
    }

    fn update(
        &self,
        id: &str,
        patch: RulePatch,
    ) -> BoxFuture<'_, RecurringSlotRule, Self::Error> {
        let client = self.client.clone();
        let path = format!("recurring_time_slot/{}", id);
        Box::pin(async move { client.patch_json(ApiGroup::Core, &path, &patch).await })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, (), Self::Error> {
        let client = self.client.clone();
        let path = format!("recurring_time_slot/{}", id);
        Box::pin(async move { client.delete(ApiGroup::Core, &path).await })
    }
}
