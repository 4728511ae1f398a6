#[cfg(test)]
mod tests {
    use crate::logic::available_slots;
    use crate::schedule::ClinicSchedule;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;

    // Helper function to build a UTC schedule with the given bounds
    fn schedule(open_hour: u32, close_hour: u32, slot_minutes: i64) -> ClinicSchedule {
        ClinicSchedule::from_config(&dentify_config::ClinicConfig {
            time_zone: Some("UTC".to_string()),
            working_days: Some(vec![
                "Mon".into(),
                "Tue".into(),
                "Wed".into(),
                "Thu".into(),
                "Fri".into(),
                "Sat".into(),
                "Sun".into(),
            ]),
            open_time: Some(format!("{:02}:00", open_hour)),
            close_time: Some(format!("{:02}:00", close_hour)),
            slot_duration_minutes: Some(slot_minutes),
            buffer_minutes: Some(0),
            practitioners: vec![],
        })
        .unwrap()
    }

    // Helper function to build non-adjacent busy periods across the day
    fn busy_periods(
        date: NaiveDate,
        count: usize,
        duration_minutes: i64,
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let mut periods = Vec::new();
        let mut current = Utc
            .from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap());

        for _ in 0..count {
            let start = current + Duration::minutes(45);
            let end = start + Duration::minutes(duration_minutes.max(1));
            periods.push((start, end));
            current = end + Duration::minutes(30);
        }

        periods
    }

    // Helper function to parse RFC3339 string to DateTime<Utc>
    fn parse_datetime(datetime_str: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(datetime_str)
            .expect("Failed to parse RFC3339 datetime")
            .with_timezone(&Utc)
    }

    proptest! {
        // No returned slot may overlap a busy period
        #[test]
        fn slots_never_overlap_busy_periods(
            day_offset in 0u32..28,
            open_hour in 6u32..10,
            close_hour in 14u32..20,
            slot_minutes in prop::sample::select(vec![15i64, 20, 30, 60]),
            busy_count in 0usize..6,
            busy_duration_minutes in 10i64..90,
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + Duration::days(day_offset as i64);
            let schedule = schedule(open_hour, close_hour, slot_minutes);
            let busy = busy_periods(date, busy_count, busy_duration_minutes);

            for slot in available_slots(date, &busy, &schedule) {
                let slot_start = parse_datetime(&slot.start_time);
                let slot_end = parse_datetime(&slot.end_time);

                for (busy_start, busy_end) in &busy {
                    prop_assert!(
                        slot_end <= *busy_start || slot_start >= *busy_end,
                        "slot {}-{} overlaps busy period {}-{}",
                        slot_start, slot_end, busy_start, busy_end
                    );
                }
            }
        }

        // All slots must lie within opening hours and be exactly one slot long
        #[test]
        fn slots_respect_opening_hours_and_granularity(
            day_offset in 0u32..28,
            open_hour in 6u32..10,
            close_hour in 14u32..20,
            slot_minutes in prop::sample::select(vec![15i64, 20, 30, 60]),
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + Duration::days(day_offset as i64);
            let schedule = schedule(open_hour, close_hour, slot_minutes);

            for slot in available_slots(date, &[], &schedule) {
                let slot_start = parse_datetime(&slot.start_time);
                let slot_end = parse_datetime(&slot.end_time);

                prop_assert_eq!(
                    (slot_end - slot_start).num_minutes(),
                    slot_minutes
                );
                prop_assert!(slot_start.time() >= schedule.open_time);
                prop_assert!(slot_end.time() <= schedule.close_time);
            }
        }

        // Slots come back sorted and mutually disjoint
        #[test]
        fn slots_are_sorted_and_disjoint(
            day_offset in 0u32..28,
            busy_count in 0usize..6,
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + Duration::days(day_offset as i64);
            let schedule = schedule(9, 17, 30);
            let busy = busy_periods(date, busy_count, 40);

            let slots: Vec<_> = available_slots(date, &busy, &schedule).collect();
            for pair in slots.windows(2) {
                let prev_end = parse_datetime(&pair[0].end_time);
                let next_start = parse_datetime(&pair[1].start_time);
                prop_assert!(prev_end <= next_start);
            }
        }
    }
}
