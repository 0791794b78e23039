#[cfg(test)]
mod tests {
    use crate::logic::group_slots_by_date;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use roofline_common::services::TimeSlot;
    use std::collections::HashSet;

    // Helper function to build a slot from small generated components
    fn make_slot(day_offset: u8, start_slot: u8, duration_halves: u8, id: u32) -> TimeSlot {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let start: DateTime<Utc> = base
            + Duration::days(day_offset as i64)
            + Duration::minutes(30 * start_slot as i64);
        let end = start + Duration::minutes(30 * (1 + duration_halves as i64));
        TimeSlot {
            slot_id: format!("s{}", id),
            start_time: start,
            end_time: end,
            date: start.date_naive(),
        }
    }

    proptest! {
        // Grouping yields exactly one slot per distinct (start, end) pair per
        // date, regardless of how many duplicate records come in.
        #[test]
        fn one_slot_per_distinct_range(
            raw in prop::collection::vec((0u8..5, 0u8..40, 0u8..4), 0..60)
        ) {
            let slots: Vec<TimeSlot> = raw
                .iter()
                .enumerate()
                .map(|(i, &(day, start, dur))| make_slot(day, start, dur, i as u32))
                .collect();

            let distinct: HashSet<_> = slots
                .iter()
                .map(|s| (s.date, s.start_time, s.end_time))
                .collect();

            let days = group_slots_by_date(slots);

            let grouped_total: usize = days.iter().map(|d| d.slots.len()).sum();
            prop_assert_eq!(grouped_total, distinct.len());
        }

        // Dates come out strictly ascending; slots within a date come out
        // ascending by start time with no duplicate ranges.
        #[test]
        fn ordering_invariants_hold(
            raw in prop::collection::vec((0u8..5, 0u8..40, 0u8..4), 0..60)
        ) {
            let slots: Vec<TimeSlot> = raw
                .iter()
                .enumerate()
                .map(|(i, &(day, start, dur))| make_slot(day, start, dur, i as u32))
                .collect();

            let days = group_slots_by_date(slots);

            for pair in days.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
            for day in &days {
                for slot in &day.slots {
                    prop_assert_eq!(slot.date, day.date);
                }
                for pair in day.slots.windows(2) {
                    prop_assert!(pair[0].start_time <= pair[1].start_time);
                    prop_assert!(
                        (pair[0].start_time, pair[0].end_time)
                            != (pair[1].start_time, pair[1].end_time)
                    );
                }
            }
        }

        // Every surviving slot is one of the inputs, and the first record of a
        // duplicated range is the one that survives.
        #[test]
        fn survivors_come_from_the_input(
            raw in prop::collection::vec((0u8..3, 0u8..10, 0u8..2), 0..40)
        ) {
            let slots: Vec<TimeSlot> = raw
                .iter()
                .enumerate()
                .map(|(i, &(day, start, dur))| make_slot(day, start, dur, i as u32))
                .collect();

            let days = group_slots_by_date(slots.clone());

            for day in &days {
                for survivor in &day.slots {
                    let first_with_range = slots
                        .iter()
                        .find(|s| {
                            s.date == survivor.date
                                && s.start_time == survivor.start_time
                                && s.end_time == survivor.end_time
                        })
                        .expect("survivor must come from the input");
                    prop_assert_eq!(&first_with_range.slot_id, &survivor.slot_id);
                }
            }
        }
    }
}
