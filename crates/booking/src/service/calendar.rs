use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use chrono::{DateTime, Local, NaiveDate};
use eyre::Result;
use log::{info, warn};
use model::ids::{DayId, WeekId};
use model::instructor::Instructor;
use model::program::Program;
use model::recurrence::{RecurrenceError, RepeatRule};
use model::schedule::Schedule;
use model::session::Session;
use model::slot::Slot;
use model::studio::Studio;
use mongodb::bson::oid::ObjectId;
use storage::reservation::ReservationStore;
use storage::schedule::ScheduleStore;
use thiserror::Error;
use tx_macro::tx;

use super::instructors::Instructors;
use super::programs::Programs;
use super::studios::Studios;

#[derive(Clone)]
pub struct Calendar {
    schedules: ScheduleStore,
    reservations: ReservationStore,
    programs: Programs,
    instructors: Instructors,
    studios: Studios,
}

/// One schedule row joined with its display attributes and booked count.
#[derive(Debug, Clone)]
pub struct DayEntry {
    pub schedule: Schedule,
    pub program: Program,
    pub instructor: Instructor,
    pub studio: Studio,
    pub booked: u64,
}

/// Result of a schedule operation: created ids in occurrence order, plus the
/// group id when the rule repeats.
#[derive(Debug, Clone)]
pub struct Scheduled {
    pub ids: Vec<ObjectId>,
    pub group_id: Option<ObjectId>,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub program_id: ObjectId,
    pub instructor_id: ObjectId,
    pub studio_id: ObjectId,
    pub start_at: DateTime<Local>,
    /// Overrides the program default when set.
    pub capacity: Option<u32>,
    pub rule: RepeatRule,
}

impl Calendar {
    pub(crate) fn new(
        schedules: ScheduleStore,
        reservations: ReservationStore,
        programs: Programs,
        instructors: Instructors,
        studios: Studios,
    ) -> Self {
        Calendar {
            schedules,
            reservations,
            programs,
            instructors,
            studios,
        }
    }

    /// Non-cancelled schedules in `[from, to]`, grouped by calendar date.
    pub async fn get_range(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Vec<DayEntry>>, ScheduleError> {
        if to < from {
            return Err(ScheduleError::InvalidRange);
        }

        let schedules = self
            .schedules
            .find_range(session, DayId::from_date(from), DayId::from_date(to).next())
            .await?;

        let ids = schedules.iter().map(|s| s.id).collect::<Vec<_>>();
        let booked = self.reservations.count_confirmed_many(session, &ids).await?;

        let programs = to_map(self.programs.get_all(session).await?, |p: &Program| p.id);
        let instructors = to_map(self.instructors.get_all(session).await?, |i: &Instructor| {
            i.id
        });
        let studios = to_map(self.studios.get_all(session).await?, |s: &Studio| s.id);

        Ok(group_entries(
            schedules,
            &programs,
            &instructors,
            &studios,
            &booked,
        ))
    }

    /// The seven days of the week containing `date`.
    pub async fn get_week(
        &self,
        session: &mut Session,
        date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Vec<DayEntry>>, ScheduleError> {
        let week = WeekId::new(DayId::from_date(date).local());
        let monday = week.day(chrono::Weekday::Mon).date();
        let sunday = week.day(chrono::Weekday::Sun).date();
        self.get_range(session, monday, sunday).await
    }

    /// Creates one schedule, or a whole recurring group when the rule repeats.
    /// Every occurrence is checked for studio slot collisions before any row
    /// is written. Returns the created ids in occurrence order.
    #[tx]
    pub async fn schedule(
        &self,
        session: &mut Session,
        new: NewSchedule,
    ) -> Result<Scheduled, ScheduleError> {
        let program = self
            .programs
            .get_by_id(session, new.program_id)
            .await?
            .ok_or(ScheduleError::ProgramNotFound)?;
        if self
            .instructors
            .get_by_id(session, new.instructor_id)
            .await?
            .is_none()
        {
            return Err(ScheduleError::InstructorNotFound);
        }
        if self
            .studios
            .get_by_id(session, new.studio_id)
            .await?
            .is_none()
        {
            return Err(ScheduleError::StudioNotFound);
        }

        let occurrences = new.rule.occurrences(new.start_at)?;
        let group_id = new.rule.kind.is_repeating().then(ObjectId::new);
        let capacity = new.capacity.unwrap_or(program.capacity);

        let mut schedules = Vec::with_capacity(occurrences.len());
        for start_at in occurrences {
            let schedule = Schedule::new(
                new.program_id,
                new.instructor_id,
                new.studio_id,
                start_at,
                program.duration_min,
                capacity,
                group_id,
            );
            if let Some(collision) = self
                .check_time_slot(session, new.studio_id, schedule.slot())
                .await?
            {
                return Err(ScheduleError::TimeSlotCollision(collision));
            }
            schedules.push(schedule);
        }

        if let Some(first) = schedules.first() {
            if !first.status(Local::now()).can_book() {
                return Err(ScheduleError::TooCloseToStart);
            }
        }

        info!(
            "Schedule {} occurrence(s) of program {}",
            schedules.len(),
            program.name
        );
        self.schedules.insert_many(session, &schedules).await?;
        Ok(Scheduled {
            ids: schedules.iter().map(|s| s.id).collect(),
            group_id,
        })
    }

    /// The first existing schedule of the studio that overlaps `slot`.
    /// Looks at the slot's day and the day before, which covers entries
    /// running past midnight.
    pub async fn check_time_slot(
        &self,
        session: &mut Session,
        studio_id: ObjectId,
        slot: Slot,
    ) -> Result<Option<Schedule>> {
        let day = slot.day_id();
        for day in [day.prev(), day] {
            let existing = self
                .schedules
                .find_day_for_studio(session, day, studio_id)
                .await?;
            if let Some(conflict) = find_conflict(&existing, &slot) {
                return Ok(Some(conflict));
            }
        }
        Ok(None)
    }

    #[tx]
    pub async fn cancel(&self, session: &mut Session, id: ObjectId) -> Result<(), ScheduleError> {
        let schedule = self
            .schedules
            .get_by_id(session, id)
            .await?
            .ok_or(ScheduleError::ScheduleNotFound)?;
        if !schedule.status(Local::now()).can_be_canceled() {
            return Err(ScheduleError::NotCancelable);
        }
        self.schedules.set_cancel_flag(session, id, true).await?;
        Ok(())
    }

    #[tx]
    pub async fn restore(&self, session: &mut Session, id: ObjectId) -> Result<(), ScheduleError> {
        let schedule = self
            .schedules
            .get_by_id(session, id)
            .await?
            .ok_or(ScheduleError::ScheduleNotFound)?;
        if !schedule.status(Local::now()).can_be_restored() {
            return Err(ScheduleError::NotCancelable);
        }
        if let Some(collision) = self
            .check_time_slot(session, schedule.studio_id, schedule.slot())
            .await?
        {
            return Err(ScheduleError::TimeSlotCollision(collision));
        }
        self.schedules.set_cancel_flag(session, id, false).await?;
        Ok(())
    }

    #[tx]
    pub async fn change_instructor(
        &self,
        session: &mut Session,
        id: ObjectId,
        instructor_id: ObjectId,
    ) -> Result<(), ScheduleError> {
        if self
            .instructors
            .get_by_id(session, instructor_id)
            .await?
            .is_none()
        {
            return Err(ScheduleError::InstructorNotFound);
        }
        if self.schedules.get_by_id(session, id).await?.is_none() {
            return Err(ScheduleError::ScheduleNotFound);
        }
        self.schedules
            .set_instructor(session, id, instructor_id)
            .await?;
        Ok(())
    }

    /// A single occurrence can only be removed while nobody holds a spot;
    /// cancel it instead once reservations exist.
    #[tx]
    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), ScheduleError> {
        if self.schedules.get_by_id(session, id).await?.is_none() {
            return Err(ScheduleError::ScheduleNotFound);
        }
        let reservations = self.reservations.find_by_schedule(session, id).await?;
        if reservations.iter().any(|r| r.is_active()) {
            return Err(ScheduleError::HasReservations);
        }
        self.schedules.delete(session, id).await?;
        Ok(())
    }

    /// Removes every schedule of the group and every reservation referencing
    /// them as one operation. Returns the number of removed schedules.
    #[tx]
    pub async fn delete_group(
        &self,
        session: &mut Session,
        group_id: ObjectId,
    ) -> Result<u64, ScheduleError> {
        let members = self.schedules.find_by_group(session, group_id).await?;
        if members.is_empty() {
            return Err(ScheduleError::GroupNotFound);
        }
        let ids = members.iter().map(|s| s.id).collect::<Vec<_>>();
        self.reservations
            .delete_by_schedules(session, &ids)
            .await?;
        let deleted = self.schedules.delete_group(session, group_id).await?;
        Ok(deleted)
    }
}

impl Deref for Calendar {
    type Target = ScheduleStore;

    fn deref(&self) -> &Self::Target {
        &self.schedules
    }
}

fn to_map<T: Clone>(items: Vec<T>, key: impl Fn(&T) -> ObjectId) -> HashMap<ObjectId, T> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

fn find_conflict(existing: &[Schedule], slot: &Slot) -> Option<Schedule> {
    existing
        .iter()
        .find(|schedule| schedule.slot().overlaps(slot))
        .cloned()
}

/// Groups schedules into date-keyed, time-ordered entries. Cancelled rows and
/// rows with dangling references are dropped.
fn group_entries(
    schedules: Vec<Schedule>,
    programs: &HashMap<ObjectId, Program>,
    instructors: &HashMap<ObjectId, Instructor>,
    studios: &HashMap<ObjectId, Studio>,
    booked: &HashMap<ObjectId, u64>,
) -> BTreeMap<NaiveDate, Vec<DayEntry>> {
    let mut days: BTreeMap<NaiveDate, Vec<DayEntry>> = BTreeMap::new();
    for schedule in schedules {
        if schedule.is_canceled {
            continue;
        }
        let (program, instructor, studio) = match (
            programs.get(&schedule.program_id),
            instructors.get(&schedule.instructor_id),
            studios.get(&schedule.studio_id),
        ) {
            (Some(p), Some(i), Some(s)) => (p.clone(), i.clone(), s.clone()),
            _ => {
                warn!("Dangling reference in schedule {}", schedule.id);
                continue;
            }
        };
        let booked = booked.get(&schedule.id).copied().unwrap_or(0);
        days.entry(schedule.day_id().date()).or_default().push(DayEntry {
            schedule,
            program,
            instructor,
            studio,
            booked,
        });
    }
    for entries in days.values_mut() {
        entries.sort_by_key(|e| e.schedule.start_at);
    }
    days
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Program not found")]
    ProgramNotFound,
    #[error("Instructor not found")]
    InstructorNotFound,
    #[error("Studio not found")]
    StudioNotFound,
    #[error("Schedule not found")]
    ScheduleNotFound,
    #[error("Recurring group not found")]
    GroupNotFound,
    #[error("Invalid date range")]
    InvalidRange,
    #[error("Invalid repeat rule:{0}")]
    InvalidRule(#[from] RecurrenceError),
    #[error("Time slot collision:{0:?}")]
    TimeSlotCollision(Schedule),
    #[error("Too close to start")]
    TooCloseToStart,
    #[error("Schedule has reservations")]
    HasReservations,
    #[error("Schedule is not in a cancellable state")]
    NotCancelable,
    #[error("Common error:{0}")]
    Common(#[from] eyre::Error),
}

impl From<mongodb::error::Error> for ScheduleError {
    fn from(e: mongodb::error::Error) -> Self {
        ScheduleError::Common(e.into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    struct Fixture {
        programs: HashMap<ObjectId, Program>,
        instructors: HashMap<ObjectId, Instructor>,
        studios: HashMap<ObjectId, Studio>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                programs: HashMap::new(),
                instructors: HashMap::new(),
                studios: HashMap::new(),
            }
        }

        fn schedule(&mut self, day: u32, hour: u32) -> Schedule {
            let program = Program::new("Yoga".to_owned(), String::new(), 60, 8);
            let instructor = Instructor::new("Aoi".to_owned(), String::new());
            let studio = Studio::new("A".to_owned(), String::new());
            let schedule = Schedule::new(
                program.id,
                instructor.id,
                studio.id,
                Local.with_ymd_and_hms(2025, 7, day, hour, 0, 0).single().unwrap(),
                60,
                8,
                None,
            );
            self.programs.insert(program.id, program);
            self.instructors.insert(instructor.id, instructor);
            self.studios.insert(studio.id, studio);
            schedule
        }

        fn group(&self, schedules: Vec<Schedule>) -> BTreeMap<NaiveDate, Vec<DayEntry>> {
            group_entries(
                schedules,
                &self.programs,
                &self.instructors,
                &self.studios,
                &HashMap::new(),
            )
        }
    }

    #[test]
    fn groups_by_date_and_orders_by_time() {
        let mut fx = Fixture::new();
        let late = fx.schedule(1, 18);
        let early = fx.schedule(1, 9);
        let other_day = fx.schedule(2, 12);

        let days = fx.group(vec![late.clone(), other_day.clone(), early.clone()]);
        assert_eq!(days.len(), 2);

        let first_day = &days[&NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()];
        assert_eq!(
            first_day.iter().map(|e| e.schedule.id).collect::<Vec<_>>(),
            vec![early.id, late.id]
        );
        assert_eq!(
            days[&NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()][0].schedule.id,
            other_day.id
        );
    }

    #[test]
    fn cancelled_schedules_are_excluded() {
        let mut fx = Fixture::new();
        let mut cancelled = fx.schedule(1, 9);
        cancelled.is_canceled = true;
        let kept = fx.schedule(1, 12);

        let days = fx.group(vec![cancelled, kept.clone()]);
        let entries = &days[&NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].schedule.id, kept.id);
    }

    #[test]
    fn dangling_references_are_dropped() {
        let mut fx = Fixture::new();
        let kept = fx.schedule(1, 9);
        let mut dangling = fx.schedule(1, 12);
        dangling.program_id = ObjectId::new();

        let days = fx.group(vec![kept.clone(), dangling]);
        let entries = &days[&NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].schedule.id, kept.id);
    }

    #[test]
    fn booked_counts_attach_to_their_schedule() {
        let mut fx = Fixture::new();
        let schedule = fx.schedule(1, 9);
        let mut booked = HashMap::new();
        booked.insert(schedule.id, 5);

        let days = group_entries(
            vec![schedule],
            &fx.programs,
            &fx.instructors,
            &fx.studios,
            &booked,
        );
        let entries = &days[&NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()];
        assert_eq!(entries[0].booked, 5);
    }

    #[test]
    fn conflict_lookup_finds_overlap() {
        let mut fx = Fixture::new();
        let existing = fx.schedule(1, 12);
        let candidate = fx.schedule(1, 12);
        let free = fx.schedule(1, 15);

        assert!(find_conflict(std::slice::from_ref(&existing), &candidate.slot()).is_some());
        assert!(find_conflict(std::slice::from_ref(&existing), &free.slot()).is_none());
    }
}
