use chrono::{DateTime, Local, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{ids::DayId, slot::Slot};

/// Reservations close this close to the class start.
pub const CLOSE_BOOKING_MIN: u32 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Schedule {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub program_id: ObjectId,
    pub instructor_id: ObjectId,
    pub studio_id: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub start_at: DateTime<Utc>,
    pub duration_min: u32,
    pub capacity: u32,
    pub recurring_group_id: Option<ObjectId>,
    #[serde(default)]
    pub is_canceled: bool,
    #[serde(default)]
    pub version: u64,
}

impl Schedule {
    pub fn new(
        program_id: ObjectId,
        instructor_id: ObjectId,
        studio_id: ObjectId,
        start_at: DateTime<Local>,
        duration_min: u32,
        capacity: u32,
        recurring_group_id: Option<ObjectId>,
    ) -> Schedule {
        Schedule {
            id: ObjectId::new(),
            program_id,
            instructor_id,
            studio_id,
            start_at: start_at.with_timezone(&Utc),
            duration_min,
            capacity,
            recurring_group_id,
            is_canceled: false,
            version: 0,
        }
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.start_at, self.duration_min)
    }

    pub fn day_id(&self) -> DayId {
        DayId::from(self.start_at)
    }

    pub fn status(&self, now: DateTime<Local>) -> ScheduleStatus {
        if self.is_canceled {
            return ScheduleStatus::Cancelled;
        }
        let slot = self.slot();
        if slot.end_at() < now {
            ScheduleStatus::Finished
        } else if slot.start_at() < now {
            ScheduleStatus::InProgress
        } else if slot.start_at() - chrono::Duration::minutes(CLOSE_BOOKING_MIN as i64) < now {
            ScheduleStatus::ClosedToBooking
        } else {
            ScheduleStatus::OpenToBooking
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    OpenToBooking,
    ClosedToBooking,
    InProgress,
    Cancelled,
    Finished,
}

/// Reference filter for schedule lookups.
#[derive(Debug, Clone, Copy)]
pub enum ScheduleFilter {
    Program(ObjectId),
    Instructor(ObjectId),
    Studio(ObjectId),
}

impl ScheduleStatus {
    pub fn can_book(&self) -> bool {
        matches!(self, ScheduleStatus::OpenToBooking)
    }

    pub fn can_be_canceled(&self) -> bool {
        matches!(
            self,
            ScheduleStatus::OpenToBooking | ScheduleStatus::ClosedToBooking
        )
    }

    pub fn can_be_restored(&self) -> bool {
        matches!(self, ScheduleStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use mongodb::bson::oid::ObjectId;

    use super::*;

    fn schedule_at(start_at: DateTime<Local>) -> Schedule {
        Schedule::new(
            ObjectId::new(),
            ObjectId::new(),
            ObjectId::new(),
            start_at,
            60,
            8,
            None,
        )
    }

    #[test]
    fn status_follows_the_clock() {
        let now = Local.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).single().unwrap();

        let upcoming = schedule_at(now + chrono::Duration::hours(3));
        assert_eq!(upcoming.status(now), ScheduleStatus::OpenToBooking);

        let soon = schedule_at(now + chrono::Duration::minutes(30));
        assert_eq!(soon.status(now), ScheduleStatus::ClosedToBooking);

        let running = schedule_at(now - chrono::Duration::minutes(30));
        assert_eq!(running.status(now), ScheduleStatus::InProgress);

        let done = schedule_at(now - chrono::Duration::hours(2));
        assert_eq!(done.status(now), ScheduleStatus::Finished);
    }

    #[test]
    fn cancelled_wins_over_time() {
        let now = Local.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).single().unwrap();
        let mut schedule = schedule_at(now + chrono::Duration::hours(3));
        schedule.is_canceled = true;
        assert_eq!(schedule.status(now), ScheduleStatus::Cancelled);
        assert!(schedule.status(now).can_be_restored());
    }
}
