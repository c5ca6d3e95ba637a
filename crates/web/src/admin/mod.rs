use axum::routing::{delete, get, post};
use axum::Router;
use mongodb::bson::oid::ObjectId;

use crate::error::ApiError;
use crate::AppState;

pub mod catalog;
pub mod reservations;
pub mod schedules;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", post(schedules::create))
        .route("/schedules/:id", delete(schedules::remove))
        .route("/schedules/:id/cancel", post(schedules::cancel))
        .route("/schedules/:id/restore", post(schedules::restore))
        .route("/schedules/:id/instructor", post(schedules::change_instructor))
        .route("/recurring/:group_id", delete(schedules::remove_group))
        .route("/reservations", get(reservations::list))
        .route("/reservations/:id/cancel", post(reservations::cancel))
        .route("/reservations/:id/status", post(reservations::set_status))
        .route("/reservations/:id/synced", post(reservations::set_synced))
        .route(
            "/programs",
            get(catalog::list_programs).post(catalog::create_program),
        )
        .route(
            "/programs/:id",
            post(catalog::update_program).delete(catalog::delete_program),
        )
        .route(
            "/instructors",
            get(catalog::list_instructors).post(catalog::create_instructor),
        )
        .route(
            "/instructors/:id",
            post(catalog::update_instructor).delete(catalog::delete_instructor),
        )
        .route(
            "/studios",
            get(catalog::list_studios).post(catalog::create_studio),
        )
        .route(
            "/studios/:id",
            post(catalog::update_studio).delete(catalog::delete_studio),
        )
        .route("/customers", get(catalog::list_customers))
}

pub(crate) fn parse_oid(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid id:{value}")))
}
