use chrono::{DateTime, Local, NaiveDate, TimeZone as _, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Calendar day anchor: midnight (local time) stored as Utc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayId(DateTime<Utc>);

impl DayId {
    pub fn new(date_time: DateTime<Local>) -> Self {
        let midnight = date_time.date_naive().and_hms_opt(0, 0, 0).unwrap();
        let local = Local.from_local_datetime(&midnight).earliest().unwrap();
        DayId(local.with_timezone(&Utc))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap();
        let local = Local.from_local_datetime(&midnight).earliest().unwrap();
        DayId(local.with_timezone(&Utc))
    }

    pub fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    pub fn date(&self) -> NaiveDate {
        self.local().date_naive()
    }

    pub fn id(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn next(&self) -> Self {
        DayId::new(self.local() + chrono::Duration::days(1))
    }

    pub fn prev(&self) -> Self {
        DayId::new(self.local() - chrono::Duration::days(1))
    }
}

impl From<DateTime<Local>> for DayId {
    fn from(date_time: DateTime<Local>) -> Self {
        DayId::new(date_time)
    }
}

impl From<DateTime<Utc>> for DayId {
    fn from(date_time: DateTime<Utc>) -> Self {
        DayId::from(date_time.with_timezone(&Local))
    }
}

/// Monday-anchored week identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeekId(DateTime<Utc>);

impl WeekId {
    pub fn new(date_time: DateTime<Local>) -> Self {
        let monday = date_time.date_naive().week(Weekday::Mon).first_day();
        WeekId(DayId::from_date(monday).id())
    }

    pub fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    pub fn day(&self, weekday: Weekday) -> DayId {
        let date = self.local() + chrono::Duration::days(weekday.num_days_from_monday() as i64);
        DayId::new(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_starts_on_monday() {
        let thursday = Local.with_ymd_and_hms(2025, 7, 3, 15, 30, 0).unwrap();
        let week = WeekId::new(thursday);
        assert_eq!(week.day(Weekday::Mon).date(), NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert_eq!(week.day(Weekday::Sun).date(), NaiveDate::from_ymd_opt(2025, 7, 6).unwrap());
    }

    #[test]
    fn day_id_next_prev() {
        let day = DayId::from_date(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        assert_eq!(day.next().date(), NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(day.prev().date(), NaiveDate::from_ymd_opt(2025, 7, 30).unwrap());
    }
}
