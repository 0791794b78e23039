#[cfg(test)]
mod tests {
    use crate::editor::{select_created, EditorPhase, RuleEditor};
    use crate::logic::{
        NewRule, RecurringSlotRule, RepeatCadence, RulePatch, RuleStatus, TimeSlotsError,
    };
    use crate::store::RuleStore;
    use roofline_common::services::BoxFuture;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("store failure: {0}")]
    struct TestError(String);

    /// In-memory store recording every write.
    #[derive(Default)]
    struct InMemoryStore {
        rules: Mutex<Vec<RecurringSlotRule>>,
        updates: Mutex<Vec<(String, RulePatch)>>,
        /// When set, `list` returns this instead of the real contents, to
        /// simulate an upstream whose refetch doesn't contain the new id.
        list_override: Mutex<Option<Vec<RecurringSlotRule>>>,
    }

    impl RuleStore for InMemoryStore {
        type Error = TestError;

        fn list(&self) -> BoxFuture<'_, Vec<RecurringSlotRule>, Self::Error> {
            Box::pin(async move {
                if let Some(list) = self.list_override.lock().unwrap().clone() {
                    return Ok(list);
                }
                Ok(self.rules.lock().unwrap().clone())
            })
        }

        fn create(&self, rule: NewRule) -> BoxFuture<'_, RecurringSlotRule, Self::Error> {
            Box::pin(async move {
                let mut rules = self.rules.lock().unwrap();
                let created = RecurringSlotRule {
                    id: format!("r{}", rules.len() + 1),
                    days: rule.days,
                    start_time: rule.start_time,
                    end_time: rule.end_time,
                    repeat: rule.repeat,
                    status: rule.status,
                    updated_at: None,
                };
                rules.push(created.clone());
                Ok(created)
            })
        }

        fn update(
            &self,
            id: &str,
            patch: RulePatch,
        ) -> BoxFuture<'_, RecurringSlotRule, Self::Error> {
            let id = id.to_string();
            Box::pin(async move {
                self.updates.lock().unwrap().push((id.clone(), patch));
                let rules = self.rules.lock().unwrap();
                rules
                    .iter()
                    .find(|r| r.id == id)
                    .cloned()
                    .ok_or_else(|| TestError(format!("no rule {}", id)))
            })
        }

        fn delete(&self, id: &str) -> BoxFuture<'_, (), Self::Error> {
            let id = id.to_string();
            Box::pin(async move {
                self.rules.lock().unwrap().retain(|r| r.id != id);
                Ok(())
            })
        }
    }

    fn rule(id: &str) -> RecurringSlotRule {
        RecurringSlotRule {
            id: id.to_string(),
            days: vec![1, 2, 3],
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            repeat: RepeatCadence::Weekly,
            status: RuleStatus::Active,
            updated_at: None,
        }
    }

    fn editor(store: Arc<InMemoryStore>) -> RuleEditor<InMemoryStore> {
        RuleEditor::new(
            store,
            Duration::from_millis(800),
            NewRule::defaults("09:00", "17:00"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn two_edits_inside_the_window_collapse_into_one_save() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());
        editor.load(rule("r1"));

        editor.set_start_time("10:00".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        editor.set_end_time("18:00".to_string());

        // Let the debounce window elapse.
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let updates = store.updates.lock().unwrap();
        assert_eq!(updates.len(), 1, "edits inside the window must collapse");
        let (id, patch) = &updates[0];
        assert_eq!(id, "r1");
        // The single save carries the state after the second edit.
        assert_eq!(patch.start_time.as_deref(), Some("10:00"));
        assert_eq!(patch.end_time.as_deref(), Some("18:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn every_new_edit_restarts_the_timer() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());
        editor.load(rule("r1"));

        editor.set_start_time("10:00".to_string());
        tokio::time::sleep(Duration::from_millis(600)).await;
        editor.set_end_time("18:00".to_string());
        tokio::time::sleep(Duration::from_millis(600)).await;

        // 1.2s after the first edit, but only 600ms after the second: the
        // restarted timer has not fired yet.
        assert!(store.updates.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.updates.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn populating_the_form_during_load_never_saves() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());

        // Switching to a rule populates every field before the editor is Ready.
        editor.begin_loading(rule("r1"));
        assert_eq!(editor.phase(), EditorPhase::Loading);
        editor.set_days(vec![0, 6]).unwrap();
        editor.set_start_time("08:00".to_string());
        editor.set_repeat(RepeatCadence::Monthly);
        editor.finish_loading();
        assert_eq!(editor.phase(), EditorPhase::Ready);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(
            store.updates.lock().unwrap().is_empty(),
            "loading a rule's data must not trigger its own re-save"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn switching_rules_drops_the_previous_rules_pending_save() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        store.rules.lock().unwrap().push(rule("r2"));
        let mut editor = editor(store.clone());
        editor.load(rule("r1"));

        editor.set_start_time("10:00".to_string());
        assert!(editor.has_pending_save());

        // The user clicks over to another rule before the save fires.
        editor.load(rule("r2"));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_the_pending_save() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());
        editor.load(rule("r1"));
        editor.set_start_time("10:00".to_string());

        drop(editor);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(
            store.updates.lock().unwrap().is_empty(),
            "a save must not fire after the editor is gone"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delete_is_immediate_and_drops_the_pending_save() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());
        editor.load(rule("r1"));
        editor.set_end_time("18:00".to_string());

        editor.delete_rule("r1").await.unwrap();

        assert!(editor.current().is_none());
        assert!(store.rules.lock().unwrap().is_empty());
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn created_rule_is_selected_by_id_from_the_refetched_list() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());

        let created = editor.create_rule().await.unwrap();

        assert_eq!(created.id, "r2");
        assert_eq!(editor.current().unwrap().id, "r2");
        // Defaults applied, ready for editing.
        assert_eq!(editor.current().unwrap().start_time, "09:00");
        assert_eq!(editor.phase(), EditorPhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn unmatched_created_id_falls_back_to_the_last_list_entry() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        // The refetch does not contain the created id.
        *store.list_override.lock().unwrap() = Some(vec![rule("a"), rule("z")]);
        let mut editor = editor(store.clone());

        let selected = editor.create_rule().await.unwrap();

        assert_eq!(selected.id, "z");
        assert_eq!(editor.current().unwrap().id, "z");
    }

    #[test]
    fn select_created_prefers_the_id_match() {
        let list = vec![rule("a"), rule("b"), rule("c")];
        assert_eq!(select_created("b", list.clone()).unwrap().id, "b");
        assert_eq!(select_created("missing", list).unwrap().id, "c");
        assert!(select_created("anything", Vec::new()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_days_keeps_the_selection_valid() {
        let store = Arc::new(InMemoryStore::default());
        store.rules.lock().unwrap().push(rule("r1"));
        let mut editor = editor(store.clone());
        editor.load(rule("r1")); // days [1, 2, 3]

        editor.toggle_day(2).unwrap();
        assert_eq!(editor.current().unwrap().days, vec![1, 3]);

        editor.toggle_day(5).unwrap();
        assert_eq!(editor.current().unwrap().days, vec![1, 3, 5]);

        assert_eq!(
            editor.toggle_day(9),
            Err(TimeSlotsError::InvalidWeekday(9))
        );
    }
}
