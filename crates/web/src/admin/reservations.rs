use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use model::reservation::{Reservation, ReservationStatus};
use model::session::Actor;
use serde::{Deserialize, Serialize};

use super::parse_oid;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub schedule_id: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: String,
    pub schedule_id: String,
    pub customer_id: String,
    pub status: String,
    pub synced: bool,
    pub created_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(reservation: Reservation) -> Self {
        ReservationDto {
            id: reservation.id.to_hex(),
            schedule_id: reservation.schedule_id.to_hex(),
            customer_id: reservation.customer_id.to_hex(),
            status: reservation.status.to_string(),
            synced: reservation.synced,
            created_at: reservation.created_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: ReservationStatus,
}

#[derive(Deserialize)]
pub struct SetSyncedRequest {
    pub synced: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReservationDto>>, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    let reservations = match (query.schedule_id, query.customer_id) {
        (Some(schedule_id), None) => {
            state
                .booking
                .reservations
                .find_by_schedule(&mut session, parse_oid(&schedule_id)?)
                .await?
        }
        (None, Some(customer_id)) => {
            state
                .booking
                .reservations
                .find_by_customer(&mut session, parse_oid(&customer_id)?)
                .await?
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Pass exactly one of scheduleId or customerId".to_owned(),
            ))
        }
    };
    Ok(Json(
        reservations.into_iter().map(ReservationDto::from).collect(),
    ))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .reservations
        .cancel(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .reservations
        .update_status(&mut session, parse_oid(&id)?, body.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_synced(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetSyncedRequest>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state
        .booking
        .reservations
        .mark_synced(&mut session, parse_oid(&id)?, body.synced)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
