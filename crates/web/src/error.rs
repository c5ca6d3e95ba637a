use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use booking::service::auth::AuthError;
use booking::service::calendar::ScheduleError;
use booking::service::reservations::ReserveError;
use booking::service::CatalogError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Reserve(#[from] ReserveError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Bad request:{0}")]
    BadRequest(String),
    #[error("Service unavailable:{0}")]
    Upstream(#[from] eyre::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Schedule(err) => match err {
                ScheduleError::ProgramNotFound
                | ScheduleError::InstructorNotFound
                | ScheduleError::StudioNotFound
                | ScheduleError::ScheduleNotFound
                | ScheduleError::GroupNotFound => StatusCode::NOT_FOUND,
                ScheduleError::InvalidRule(_)
                | ScheduleError::InvalidRange
                | ScheduleError::TooCloseToStart => StatusCode::BAD_REQUEST,
                ScheduleError::TimeSlotCollision(_)
                | ScheduleError::HasReservations
                | ScheduleError::NotCancelable => StatusCode::CONFLICT,
                ScheduleError::Common(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Reserve(err) => match err {
                ReserveError::ScheduleNotFound | ReserveError::ReservationNotFound => {
                    StatusCode::NOT_FOUND
                }
                ReserveError::InvalidContact => StatusCode::BAD_REQUEST,
                ReserveError::NotOpenToBooking(_)
                | ReserveError::AlreadyReserved
                | ReserveError::CapacityExceeded
                | ReserveError::AlreadyCancelled => StatusCode::CONFLICT,
                ReserveError::Common(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound => StatusCode::NOT_FOUND,
                CatalogError::AlreadyExists | CatalogError::InUse => StatusCode::CONFLICT,
                CatalogError::Common(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Auth(err) => match err {
                AuthError::InvalidAccessKey
                | AuthError::SessionNotFound
                | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
                AuthError::Common(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Read-path failures eligible for the demo fallback.
    pub fn is_upstream(&self) -> bool {
        self.status() == StatusCode::SERVICE_UNAVAILABLE
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            log::error!("Upstream failure: {:#}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use model::recurrence::RecurrenceError;

    use super::*;

    #[test]
    fn capacity_exceeded_maps_to_conflict() {
        let err = ApiError::from(ReserveError::CapacityExceeded);
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            ApiError::from(ReserveError::ScheduleNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ScheduleError::GroupNotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn invalid_rule_maps_to_bad_request() {
        let err = ApiError::from(ScheduleError::InvalidRule(RecurrenceError::MissingBound));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn db_failures_are_upstream() {
        let err = ApiError::from(ScheduleError::Common(eyre::eyre!("connection reset")));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_upstream());
        assert!(!ApiError::from(ReserveError::CapacityExceeded).is_upstream());
    }
}
