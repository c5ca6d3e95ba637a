use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use booking::service::reservations::ReservationRequest;
use log::warn;
use model::session::Actor;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub schedule_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub line_user_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub id: String,
    pub status: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRequest>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let schedule_id = crate::admin::parse_oid(&body.schedule_id)?;
    let mut session = state.booking.db.start_session(Actor::Anonymous).await?;

    let (reservation, schedule) = state
        .booking
        .reservations
        .reserve(
            &mut session,
            ReservationRequest {
                schedule_id,
                name: body.name,
                phone: body.phone,
                email: body.email,
                line_user_id: body.line_user_id,
            },
        )
        .await?;
    session.set_actor(Actor::Customer(reservation.customer_id));

    let response = CreateResponse {
        id: reservation.id.to_hex(),
        status: reservation.status.to_string(),
    };

    // The reservation is committed; notification runs detached and its
    // failures never surface here.
    let customer = state
        .booking
        .customers
        .get_by_id(&mut session, reservation.customer_id)
        .await
        .ok()
        .flatten();
    let program = state
        .booking
        .programs
        .get_by_id(&mut session, schedule.program_id)
        .await
        .ok()
        .flatten();
    match (customer, program) {
        (Some(customer), Some(program)) => {
            let notifier = state.notifier.clone();
            tokio::spawn(async move {
                notifier
                    .reservation_created(&reservation, &schedule, &customer, &program)
                    .await;
            });
        }
        _ => warn!(
            "Skipping notification for reservation {}, reference load failed",
            reservation.id
        ),
    }

    Ok((StatusCode::CREATED, Json(response)))
}
