use chrono::{DateTime, Datelike as _, Local, NaiveDate, TimeZone as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recurring series never extend further than this from the base date.
pub const MAX_HORIZON_DAYS: i64 = 365 * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RepeatKind {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatKind {
    pub fn is_repeating(&self) -> bool {
        !matches!(self, RepeatKind::None)
    }
}

/// Repeat rule: a kind plus exactly one bound for repeating kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RepeatRule {
    pub kind: RepeatKind,
    pub until: Option<NaiveDate>,
    pub count: Option<u32>,
}

impl RepeatRule {
    pub fn one_time() -> Self {
        RepeatRule {
            kind: RepeatKind::None,
            until: None,
            count: None,
        }
    }

    pub fn validate(&self) -> Result<(), RecurrenceError> {
        match self.kind {
            RepeatKind::None => {
                if self.until.is_some() || self.count.is_some() {
                    return Err(RecurrenceError::BoundWithoutRepeat);
                }
            }
            _ => match (self.until, self.count) {
                (None, None) => return Err(RecurrenceError::MissingBound),
                (Some(_), Some(_)) => return Err(RecurrenceError::ConflictingBounds),
                (None, Some(0)) => return Err(RecurrenceError::ZeroCount),
                _ => {}
            },
        }
        Ok(())
    }

    /// Expand the rule into occurrence start times. The base date is always
    /// the first occurrence. Daily steps one day, weekly seven; monthly keeps
    /// the base day-of-month and yearly the base day-of-year, skipping
    /// calendar units where that day does not exist. Generation stops at the
    /// rule bound or the horizon, whichever comes first.
    pub fn occurrences(&self, base: DateTime<Local>) -> Result<Vec<DateTime<Local>>, RecurrenceError> {
        self.validate()?;
        if !self.kind.is_repeating() {
            return Ok(vec![base]);
        }

        let base_date = base.date_naive();
        let horizon = base_date + chrono::Duration::days(MAX_HORIZON_DAYS);
        let last_date = match self.until {
            Some(until) => {
                if until < base_date {
                    return Err(RecurrenceError::EndBeforeStart);
                }
                until.min(horizon)
            }
            None => horizon,
        };

        let mut out = Vec::new();
        for step in 0.. {
            // Anchor is monotone even for steps whose exact date is skipped.
            let Some(anchor) = self.anchor(base_date, step) else {
                break;
            };
            if anchor > last_date {
                break;
            }
            if let Some(count) = self.count {
                if out.len() as u32 == count {
                    break;
                }
            }

            let Some(date) = self.nth_date(base_date, step) else {
                continue;
            };
            if date > last_date {
                break;
            }
            out.push(at_base_time(date, base));
        }
        Ok(out)
    }

    /// Exact date of the n-th occurrence, `None` when the calendar unit lacks
    /// the base day (Jan 31 + 1 month, Feb 29 in a non-leap year).
    fn nth_date(&self, base: NaiveDate, step: u32) -> Option<NaiveDate> {
        match self.kind {
            RepeatKind::None => (step == 0).then_some(base),
            RepeatKind::Daily => base.checked_add_days(chrono::Days::new(step as u64)),
            RepeatKind::Weekly => base.checked_add_days(chrono::Days::new(step as u64 * 7)),
            RepeatKind::Monthly => {
                let months = base.month0() + step;
                let year = base.year() + (months / 12) as i32;
                NaiveDate::from_ymd_opt(year, months % 12 + 1, base.day())
            }
            RepeatKind::Yearly => {
                NaiveDate::from_ymd_opt(base.year() + step as i32, base.month(), base.day())
            }
        }
    }

    /// Lower bound for the n-th occurrence, defined for every step.
    fn anchor(&self, base: NaiveDate, step: u32) -> Option<NaiveDate> {
        match self.kind {
            RepeatKind::Monthly => {
                let months = base.month0() + step;
                let year = base.year() + (months / 12) as i32;
                NaiveDate::from_ymd_opt(year, months % 12 + 1, 1)
            }
            RepeatKind::Yearly => NaiveDate::from_ymd_opt(base.year() + step as i32, 1, 1),
            _ => self.nth_date(base, step),
        }
    }
}

fn at_base_time(date: NaiveDate, base: DateTime<Local>) -> DateTime<Local> {
    Local
        .from_local_datetime(&date.and_time(base.time()))
        .earliest()
        .unwrap_or(base)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Repeat bound is required")]
    MissingBound,
    #[error("End date and count are mutually exclusive")]
    ConflictingBounds,
    #[error("Repeat count must be positive")]
    ZeroCount,
    #[error("End date is before the first occurrence")]
    EndBeforeStart,
    #[error("Bound given for a non-repeating rule")]
    BoundWithoutRepeat,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).single().unwrap()
    }

    fn counted(kind: RepeatKind, count: u32) -> RepeatRule {
        RepeatRule {
            kind,
            until: None,
            count: Some(count),
        }
    }

    fn bounded(kind: RepeatKind, until: NaiveDate) -> RepeatRule {
        RepeatRule {
            kind,
            until: Some(until),
            count: None,
        }
    }

    fn dates(rule: RepeatRule, base: DateTime<Local>) -> Vec<NaiveDate> {
        rule.occurrences(base)
            .unwrap()
            .into_iter()
            .map(|d| d.date_naive())
            .collect()
    }

    #[test]
    fn one_time_is_single_occurrence() {
        assert_eq!(dates(RepeatRule::one_time(), base()), vec![base().date_naive()]);
    }

    #[test]
    fn weekly_count_of_three() {
        assert_eq!(
            dates(counted(RepeatKind::Weekly, 3), base()),
            vec![
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 8).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            ]
        );
    }

    #[test]
    fn daily_until_is_inclusive() {
        let rule = bounded(RepeatKind::Daily, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert_eq!(dates(rule, base()).len(), 4);
    }

    #[test]
    fn weekly_until_stops_before_bound() {
        let rule = bounded(RepeatKind::Weekly, NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        assert_eq!(
            dates(rule, base()),
            vec![
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 8).unwrap(),
            ]
        );
    }

    #[test]
    fn monthly_keeps_day_of_month() {
        assert_eq!(
            dates(counted(RepeatKind::Monthly, 3), base()),
            vec![
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn monthly_from_the_31st_skips_short_months() {
        let base = Local.with_ymd_and_hms(2025, 1, 31, 18, 0, 0).single().unwrap();
        assert_eq!(
            dates(counted(RepeatKind::Monthly, 4), base),
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            ]
        );
    }

    #[test]
    fn yearly_steps_by_year() {
        assert_eq!(
            dates(counted(RepeatKind::Yearly, 2), base()),
            vec![
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn yearly_from_leap_day_skips_common_years() {
        let base = Local.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).single().unwrap();
        // The next leap day is beyond the two-year horizon.
        assert_eq!(
            dates(counted(RepeatKind::Yearly, 3), base),
            vec![NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()]
        );
    }

    #[test]
    fn horizon_truncates_large_counts() {
        let generated = dates(counted(RepeatKind::Weekly, 1000), base());
        assert_eq!(generated.len() as i64, MAX_HORIZON_DAYS / 7 + 1);
    }

    #[test]
    fn occurrences_keep_base_time() {
        let times = counted(RepeatKind::Daily, 2).occurrences(base()).unwrap();
        assert!(times.iter().all(|t| t.time() == base().time()));
    }

    #[test]
    fn repeating_rule_requires_a_bound() {
        let rule = RepeatRule {
            kind: RepeatKind::Weekly,
            until: None,
            count: None,
        };
        assert_eq!(rule.validate(), Err(RecurrenceError::MissingBound));
    }

    #[test]
    fn bounds_are_mutually_exclusive() {
        let rule = RepeatRule {
            kind: RepeatKind::Daily,
            until: Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
            count: Some(3),
        };
        assert_eq!(rule.validate(), Err(RecurrenceError::ConflictingBounds));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(
            counted(RepeatKind::Monthly, 0).validate(),
            Err(RecurrenceError::ZeroCount)
        );
    }

    #[test]
    fn end_date_before_base_is_rejected() {
        let rule = bounded(RepeatKind::Daily, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(
            rule.occurrences(base()),
            Err(RecurrenceError::EndBeforeStart)
        );
    }

    #[test]
    fn one_time_rule_rejects_bounds() {
        let rule = RepeatRule {
            kind: RepeatKind::None,
            until: None,
            count: Some(1),
        };
        assert_eq!(rule.validate(), Err(RecurrenceError::BoundWithoutRepeat));
    }
}
