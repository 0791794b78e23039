#[cfg(test)]
mod tests {
    use crate::selection::{PendingSelection, SelectionError, SelectionFlow, SelectionPhase};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use roofline_common::services::{BookingRecord, BookingStatus, Presence, TimeSlot};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn slot_on(date: &str, slot_id: &str) -> TimeSlot {
        let date: NaiveDate = date.parse().unwrap();
        TimeSlot {
            slot_id: slot_id.to_string(),
            start_time: utc(2024, 6, 10, 13),
            end_time: utc(2024, 6, 10, 14),
            date,
        }
    }

    fn existing_booking() -> BookingRecord {
        BookingRecord {
            id: "b1".to_string(),
            date_of_inspection: "2024-06-10".parse().unwrap(),
            start_time: utc(2024, 6, 10, 13),
            end_time: utc(2024, 6, 10, 14),
            booking_status: BookingStatus::Confirmed,
            will_someone_be_present: Some(Presence::Maybe),
            time_slot_id: Some("s1".to_string()),
        }
    }

    #[test]
    fn fresh_flow_starts_browsing() {
        let flow = SelectionFlow::open(None, None);
        assert_eq!(flow.phase(), SelectionPhase::Browsing);
        assert_eq!(flow.pending(), &PendingSelection::default());
    }

    #[test]
    fn opening_over_an_existing_booking_seeds_date_and_presence() {
        let booking = existing_booking();
        let flow = SelectionFlow::open(Some(&booking), Some("roof".to_string()));
        assert_eq!(
            flow.pending().date,
            Some("2024-06-10".parse::<NaiveDate>().unwrap())
        );
        assert_eq!(flow.pending().presence, Some(Presence::Maybe));
        assert!(flow.pending().slot.is_none());
    }

    #[test]
    fn changing_the_date_resets_the_chosen_time() {
        let mut flow = SelectionFlow::open(None, None);
        flow.select_date("2024-06-10".parse().unwrap());
        flow.select_slot(slot_on("2024-06-10", "s1")).unwrap();
        assert_eq!(flow.phase(), SelectionPhase::TimeSelected);

        flow.select_date("2024-06-12".parse().unwrap());

        assert_eq!(
            flow.pending().date,
            Some("2024-06-12".parse::<NaiveDate>().unwrap())
        );
        assert!(flow.pending().slot.is_none());
        assert_eq!(flow.phase(), SelectionPhase::DateSelected);
    }

    #[test]
    fn reselecting_the_same_date_keeps_the_chosen_time() {
        let mut flow = SelectionFlow::open(None, None);
        flow.select_date("2024-06-10".parse().unwrap());
        flow.select_slot(slot_on("2024-06-10", "s1")).unwrap();

        flow.select_date("2024-06-10".parse().unwrap());

        assert!(flow.pending().slot.is_some());
    }

    #[test]
    fn a_slot_outside_the_selected_date_is_rejected() {
        let mut flow = SelectionFlow::open(None, None);
        flow.select_date("2024-06-10".parse().unwrap());
        let err = flow.select_slot(slot_on("2024-06-12", "s2")).unwrap_err();
        assert!(matches!(err, SelectionError::SlotDateMismatch { .. }));
    }

    #[test]
    fn a_slot_cannot_be_chosen_before_a_date() {
        let mut flow = SelectionFlow::open(None, None);
        assert_eq!(
            flow.select_slot(slot_on("2024-06-10", "s1")),
            Err(SelectionError::NoDateSelected)
        );
    }

    #[test]
    fn submit_is_enabled_only_with_all_four_fields() {
        let mut flow = SelectionFlow::open(None, None);
        flow.select_date("2024-06-10".parse().unwrap());
        flow.select_slot(slot_on("2024-06-10", "s1")).unwrap();
        flow.set_inspection_type("roof".to_string());
        assert!(!flow.ready_to_submit()); // presence still missing

        flow.set_presence(Presence::Yes);
        assert!(flow.ready_to_submit());
        assert_eq!(flow.phase(), SelectionPhase::ReadyToSubmit);

        // Removing any one of the four disables submission again.
        flow.select_date("2024-06-12".parse().unwrap()); // drops the slot
        assert!(!flow.ready_to_submit());
    }

    #[test]
    fn begin_submit_is_refused_outside_ready_to_submit() {
        let mut flow = SelectionFlow::open(None, None);
        assert_eq!(flow.begin_submit(), Err(SelectionError::NotReady));

        flow.select_date("2024-06-10".parse().unwrap());
        flow.select_slot(slot_on("2024-06-10", "s1")).unwrap();
        flow.set_inspection_type("roof".to_string());
        flow.set_presence(Presence::Yes);
        flow.begin_submit().unwrap();
        assert_eq!(flow.phase(), SelectionPhase::Submitting);
        assert_eq!(flow.begin_submit(), Err(SelectionError::AlreadySubmitting));
    }

    #[test]
    fn failed_submit_keeps_the_pending_selection_for_retry() {
        let mut flow = SelectionFlow::open(None, None);
        flow.select_date("2024-06-10".parse().unwrap());
        flow.select_slot(slot_on("2024-06-10", "s1")).unwrap();
        flow.set_inspection_type("roof".to_string());
        flow.set_presence(Presence::Yes);
        flow.begin_submit().unwrap();

        flow.fail();
        assert_eq!(flow.phase(), SelectionPhase::Failed);
        // Nothing was re-entered, yet the retry is immediately submittable.
        flow.retry();
        assert!(flow.ready_to_submit());
        assert_eq!(flow.pending().slot.as_ref().unwrap().slot_id, "s1");
    }

    #[test]
    fn only_a_successful_submit_promotes_pending_to_confirmed() {
        let mut flow = SelectionFlow::open(None, None);
        flow.select_date("2024-06-10".parse().unwrap());
        flow.select_slot(slot_on("2024-06-10", "s1")).unwrap();
        flow.set_inspection_type("roof".to_string());
        flow.set_presence(Presence::Yes);
        assert!(flow.confirmed().is_none());

        flow.begin_submit().unwrap();
        flow.complete(existing_booking());

        assert_eq!(flow.phase(), SelectionPhase::Confirmed);
        assert_eq!(flow.confirmed().unwrap().id, "b1");
    }

    #[test]
    fn cancel_restores_the_state_from_when_the_flow_opened() {
        let booking = existing_booking();
        let mut flow = SelectionFlow::open(Some(&booking), None);
        let opened_pending = flow.pending().clone();

        flow.select_date("2024-06-12".parse().unwrap());
        flow.select_slot(slot_on("2024-06-12", "s7")).unwrap();
        flow.set_presence(Presence::No);

        flow.cancel();

        assert_eq!(flow.pending(), &opened_pending);
        // The confirmed booking was never touched.
        assert_eq!(flow.confirmed().unwrap().id, "b1");
    }
}
