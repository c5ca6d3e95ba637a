use std::collections::BTreeMap;

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::schedule::EntryDto;

const SLOTS: [(&str, &str, &str, &str, u32, u64); 3] = [
    ("10:00", "Morning Yoga", "Aoi", "Studio A", 8, 3),
    ("14:00", "Pilates Basics", "Mika", "Studio B", 6, 2),
    ("19:00", "Power Training", "Ken", "Studio A", 10, 7),
];

/// Built-in demo week, served on public reads when the database is down and
/// `DEMO_FALLBACK` is set.
pub fn demo_week(from: NaiveDate) -> BTreeMap<String, Vec<EntryDto>> {
    (0..7)
        .map(|offset| {
            let date = from + chrono::Duration::days(offset);
            let entries = SLOTS
                .iter()
                .map(|(time, program, instructor, studio, capacity, booked)| EntryDto {
                    id: ObjectId::new().to_hex(),
                    time: (*time).to_owned(),
                    program: (*program).to_owned(),
                    instructor: (*instructor).to_owned(),
                    studio: (*studio).to_owned(),
                    capacity: *capacity,
                    booked: *booked,
                })
                .collect();
            (date.format("%Y-%m-%d").to_string(), entries)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_covers_seven_days_in_time_order() {
        let from = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let week = demo_week(from);
        assert_eq!(week.len(), 7);
        assert!(week.contains_key("2025-06-30"));
        assert!(week.contains_key("2025-07-06"));
        for entries in week.values() {
            assert!(!entries.is_empty());
            let times = entries.iter().map(|e| e.time.as_str()).collect::<Vec<_>>();
            let mut sorted = times.clone();
            sorted.sort();
            assert_eq!(times, sorted);
        }
    }
}
