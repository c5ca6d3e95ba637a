use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use booking::service::calendar::DayEntry;
use chrono::{NaiveDate, Weekday};
use log::warn;
use model::session::Actor;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::fallback;
use crate::AppState;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
pub struct WeekQuery {
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EntryDto {
    pub id: String,
    pub time: String,
    pub program: String,
    pub instructor: String,
    pub studio: String,
    pub capacity: u32,
    pub booked: u64,
}

impl From<DayEntry> for EntryDto {
    fn from(entry: DayEntry) -> Self {
        let slot = entry.schedule.slot();
        EntryDto {
            id: entry.schedule.id.to_hex(),
            time: slot.start_at().format("%H:%M").to_string(),
            program: entry.program.name,
            instructor: entry.instructor.name,
            studio: entry.studio.name,
            capacity: entry.schedule.capacity,
            booked: entry.booked,
        }
    }
}

pub(crate) fn to_dto(
    days: BTreeMap<NaiveDate, Vec<DayEntry>>,
) -> BTreeMap<String, Vec<EntryDto>> {
    days.into_iter()
        .map(|(date, entries)| {
            (
                date.format("%Y-%m-%d").to_string(),
                entries.into_iter().map(EntryDto::from).collect(),
            )
        })
        .collect()
}

pub async fn range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<BTreeMap<String, Vec<EntryDto>>>, ApiError> {
    let result = load_range(&state, query.from, query.to).await;
    respond(&state, result, query.from)
}

pub async fn week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<BTreeMap<String, Vec<EntryDto>>>, ApiError> {
    let monday = query.date.week(Weekday::Mon).first_day();
    let result = load_week(&state, query.date).await;
    respond(&state, result, monday)
}

async fn load_range(
    state: &AppState,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<BTreeMap<NaiveDate, Vec<DayEntry>>, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Anonymous).await?;
    Ok(state
        .booking
        .calendar
        .get_range(&mut session, from, to)
        .await?)
}

async fn load_week(
    state: &AppState,
    date: NaiveDate,
) -> Result<BTreeMap<NaiveDate, Vec<DayEntry>>, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Anonymous).await?;
    Ok(state.booking.calendar.get_week(&mut session, date).await?)
}

fn respond(
    state: &AppState,
    result: Result<BTreeMap<NaiveDate, Vec<DayEntry>>, ApiError>,
    from: NaiveDate,
) -> Result<Json<BTreeMap<String, Vec<EntryDto>>>, ApiError> {
    match result {
        Ok(days) => Ok(Json(to_dto(days))),
        Err(err) if err.is_upstream() && state.env.demo_fallback() => {
            warn!("Serving fixture schedule, database unavailable: {:#}", err);
            Ok(Json(fallback::demo_week(from)))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone as _};
    use model::instructor::Instructor;
    use model::program::Program;
    use model::schedule::Schedule;
    use model::studio::Studio;

    use super::*;

    #[test]
    fn entry_dto_wire_shape() {
        let program = Program::new("Yoga".to_owned(), String::new(), 60, 8);
        let instructor = Instructor::new("Aoi".to_owned(), String::new());
        let studio = Studio::new("Studio A".to_owned(), String::new());
        let schedule = Schedule::new(
            program.id,
            instructor.id,
            studio.id,
            Local.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).single().unwrap(),
            60,
            8,
            None,
        );
        let mut days = BTreeMap::new();
        days.insert(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            vec![DayEntry {
                schedule,
                program,
                instructor,
                studio,
                booked: 3,
            }],
        );

        let value = serde_json::to_value(to_dto(days)).unwrap();
        let entry = &value["2025-07-01"][0];
        assert_eq!(entry["time"], "10:00");
        assert_eq!(entry["program"], "Yoga");
        assert_eq!(entry["instructor"], "Aoi");
        assert_eq!(entry["studio"], "Studio A");
        assert_eq!(entry["capacity"], 8);
        assert_eq!(entry["booked"], 3);
    }
}
