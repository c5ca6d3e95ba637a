use std::fmt::Debug;

use chrono::{DateTime, Local, Utc};

use crate::ids::DayId;

/// Half-open time interval of a schedule entry.
#[derive(Clone, Copy)]
pub struct Slot {
    start_at: DateTime<Utc>,
    duration_min: u32,
}

impl Slot {
    pub fn new(start_at: DateTime<Utc>, duration_min: u32) -> Slot {
        Slot {
            start_at,
            duration_min,
        }
    }

    pub fn start_at(&self) -> DateTime<Local> {
        self.start_at.with_timezone(&Local)
    }

    pub fn start_at_utc(&self) -> DateTime<Utc> {
        self.start_at
    }

    pub fn end_at(&self) -> DateTime<Local> {
        self.start_at() + chrono::Duration::minutes(self.duration_min as i64)
    }

    pub fn duration_min(&self) -> u32 {
        self.duration_min
    }

    pub fn day_id(&self) -> DayId {
        DayId::from(self.start_at)
    }

    pub fn contains(&self, time: DateTime<Local>) -> bool {
        time >= self.start_at() && time < self.end_at()
    }

    /// Two slots conflict when the half-open intervals intersect.
    /// Back-to-back slots do not conflict.
    pub fn overlaps(&self, other: &Slot) -> bool {
        let this_end = self.start_at + chrono::Duration::minutes(self.duration_min as i64);
        let other_end = other.start_at + chrono::Duration::minutes(other.duration_min as i64);
        self.start_at < other_end && other.start_at < this_end
    }
}

impl Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} {}..{}]",
            self.start_at().format("%d.%m"),
            self.start_at().format("%H:%M"),
            self.end_at().format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn slot(h: u32, m: u32, duration_min: u32) -> Slot {
        Slot::new(
            Utc.with_ymd_and_hms(2025, 7, 1, h, m, 0).single().unwrap(),
            duration_min,
        )
    }

    #[test]
    fn no_overlap_when_apart() {
        assert!(!slot(12, 0, 60).overlaps(&slot(14, 0, 60)));
    }

    #[test]
    fn overlap_at_start() {
        assert!(slot(12, 0, 60).overlaps(&slot(12, 30, 60)));
    }

    #[test]
    fn overlap_at_end() {
        assert!(slot(12, 0, 60).overlaps(&slot(11, 30, 60)));
    }

    #[test]
    fn overlap_contained() {
        assert!(slot(12, 0, 120).overlaps(&slot(12, 30, 30)));
    }

    #[test]
    fn overlap_exact_match() {
        assert!(slot(12, 0, 60).overlaps(&slot(12, 0, 60)));
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        assert!(!slot(12, 0, 60).overlaps(&slot(13, 0, 60)));
        assert!(!slot(13, 0, 60).overlaps(&slot(12, 0, 60)));
    }

    #[test]
    fn overlap_across_midnight() {
        let late = Slot::new(
            Utc.with_ymd_and_hms(2025, 7, 1, 23, 30, 0).single().unwrap(),
            60,
        );
        let next_day = Slot::new(
            Utc.with_ymd_and_hms(2025, 7, 2, 0, 0, 0).single().unwrap(),
            60,
        );
        assert!(late.overlaps(&next_day));
    }

    #[test]
    fn no_overlap_different_days() {
        let first = Slot::new(
            Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).single().unwrap(),
            60,
        );
        let second = Slot::new(
            Utc.with_ymd_and_hms(2025, 7, 2, 12, 0, 0).single().unwrap(),
            60,
        );
        assert!(!first.overlaps(&second));
    }

    #[test]
    fn contains_is_half_open() {
        let slot = slot(12, 0, 60);
        assert!(slot.contains(slot.start_at()));
        assert!(slot.contains(slot.start_at() + chrono::Duration::minutes(30)));
        assert!(!slot.contains(slot.end_at()));
    }
}
