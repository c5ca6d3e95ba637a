use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use booking::service::calendar::NewSchedule;
use chrono::{DateTime, Local, NaiveDate};
use model::recurrence::{RepeatKind, RepeatRule};
use model::session::Actor;
use serde::{Deserialize, Serialize};

use super::parse_oid;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub program_id: String,
    pub instructor_id: String,
    pub studio_id: String,
    pub start_at: DateTime<Local>,
    pub capacity: Option<u32>,
    pub repeat: Option<RepeatDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatDto {
    pub kind: RepeatKind,
    pub until: Option<NaiveDate>,
    pub count: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub ids: Vec<String>,
    pub recurring_group_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteGroupResponse {
    pub deleted: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInstructorRequest {
    pub instructor_id: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRequest>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let rule = match body.repeat {
        Some(repeat) => RepeatRule {
            kind: repeat.kind,
            until: repeat.until,
            count: repeat.count,
        },
        None => RepeatRule::one_time(),
    };
    let new = NewSchedule {
        program_id: parse_oid(&body.program_id)?,
        instructor_id: parse_oid(&body.instructor_id)?,
        studio_id: parse_oid(&body.studio_id)?,
        start_at: body.start_at,
        capacity: body.capacity,
        rule,
    };

    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    let scheduled = state.booking.calendar.schedule(&mut session, new).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            ids: scheduled.ids.iter().map(|id| id.to_hex()).collect(),
            recurring_group_id: scheduled.group_id.map(|id| id.to_hex()),
        }),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .calendar
        .delete(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .calendar
        .cancel(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .calendar
        .restore(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ChangeInstructorRequest>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .calendar
        .change_instructor(&mut session, parse_oid(&id)?, parse_oid(&body.instructor_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<DeleteGroupResponse>, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    let deleted = state
        .booking
        .calendar
        .delete_group(&mut session, parse_oid(&group_id)?)
        .await?;
    Ok(Json(DeleteGroupResponse { deleted }))
}
