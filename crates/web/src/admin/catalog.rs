use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use model::customer::Customer;
use model::instructor::Instructor;
use model::program::Program;
use model::session::{Actor, Session};
use model::studio::Studio;
use serde::{Deserialize, Serialize};

use super::parse_oid;
use crate::error::ApiError;
use crate::AppState;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration_min: u32,
    pub capacity: u32,
}

impl From<Program> for ProgramDto {
    fn from(program: Program) -> Self {
        ProgramDto {
            id: program.id.to_hex(),
            name: program.name,
            description: program.description,
            duration_min: program.duration_min,
            capacity: program.capacity,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration_min: u32,
    pub capacity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_min: Option<u32>,
    pub capacity: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDto {
    pub id: String,
    pub name: String,
    pub bio: String,
}

impl From<Instructor> for InstructorDto {
    fn from(instructor: Instructor) -> Self {
        InstructorDto {
            id: instructor.id.to_hex(),
            name: instructor.name,
            bio: instructor.bio,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateInstructorRequest {
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Deserialize)]
pub struct UpdateInstructorRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StudioDto {
    pub id: String,
    pub name: String,
    pub address: String,
}

impl From<Studio> for StudioDto {
    fn from(studio: Studio) -> Self {
        StudioDto {
            id: studio.id.to_hex(),
            name: studio.name,
            address: studio.address,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateStudioRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Deserialize)]
pub struct UpdateStudioRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub line_user_id: Option<String>,
    pub created_at: String,
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        CustomerDto {
            id: customer.id.to_hex(),
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            line_user_id: customer.line_user_id,
            created_at: customer.created_at.to_rfc3339(),
        }
    }
}

async fn staff_session(state: &AppState) -> Result<Session, ApiError> {
    Ok(state.booking.db.start_session(Actor::Staff).await?)
}

pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgramDto>>, ApiError> {
    let mut session = staff_session(&state).await?;
    let programs = state.booking.programs.get_all(&mut session).await?;
    Ok(Json(programs.into_iter().map(ProgramDto::from).collect()))
}

pub async fn create_program(
    State(state): State<AppState>,
    Json(body): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramDto>), ApiError> {
    let mut session = staff_session(&state).await?;
    let program = state
        .booking
        .programs
        .create(
            &mut session,
            body.name,
            body.description,
            body.duration_min,
            body.capacity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(program.into())))
}

pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProgramRequest>,
) -> Result<StatusCode, ApiError> {
    let id = parse_oid(&id)?;
    let mut session = staff_session(&state).await?;
    let programs = &state.booking.programs;
    if let Some(name) = &body.name {
        programs.edit_name(&mut session, id, name).await?;
    }
    if let Some(description) = &body.description {
        programs.edit_description(&mut session, id, description).await?;
    }
    if let Some(duration_min) = body.duration_min {
        programs.edit_duration(&mut session, id, duration_min).await?;
    }
    if let Some(capacity) = body.capacity {
        programs.edit_capacity(&mut session, id, capacity).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = staff_session(&state).await?;
    state
        .booking
        .programs
        .delete(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_instructors(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstructorDto>>, ApiError> {
    let mut session = staff_session(&state).await?;
    let instructors = state.booking.instructors.get_all(&mut session).await?;
    Ok(Json(
        instructors.into_iter().map(InstructorDto::from).collect(),
    ))
}

pub async fn create_instructor(
    State(state): State<AppState>,
    Json(body): Json<CreateInstructorRequest>,
) -> Result<(StatusCode, Json<InstructorDto>), ApiError> {
    let mut session = staff_session(&state).await?;
    let instructor = state
        .booking
        .instructors
        .create(&mut session, body.name, body.bio)
        .await?;
    Ok((StatusCode::CREATED, Json(instructor.into())))
}

pub async fn update_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateInstructorRequest>,
) -> Result<StatusCode, ApiError> {
    let id = parse_oid(&id)?;
    let mut session = staff_session(&state).await?;
    let instructors = &state.booking.instructors;
    if let Some(name) = &body.name {
        instructors.edit_name(&mut session, id, name).await?;
    }
    if let Some(bio) = &body.bio {
        instructors.edit_bio(&mut session, id, bio).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = staff_session(&state).await?;
    state
        .booking
        .instructors
        .delete(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_studios(State(state): State<AppState>) -> Result<Json<Vec<StudioDto>>, ApiError> {
    let mut session = staff_session(&state).await?;
    let studios = state.booking.studios.get_all(&mut session).await?;
    Ok(Json(studios.into_iter().map(StudioDto::from).collect()))
}

pub async fn create_studio(
    State(state): State<AppState>,
    Json(body): Json<CreateStudioRequest>,
) -> Result<(StatusCode, Json<StudioDto>), ApiError> {
    let mut session = staff_session(&state).await?;
    let studio = state
        .booking
        .studios
        .create(&mut session, body.name, body.address)
        .await?;
    Ok((StatusCode::CREATED, Json(studio.into())))
}

pub async fn update_studio(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStudioRequest>,
) -> Result<StatusCode, ApiError> {
    let id = parse_oid(&id)?;
    let mut session = staff_session(&state).await?;
    let studios = &state.booking.studios;
    if let Some(name) = &body.name {
        studios.edit_name(&mut session, id, name).await?;
    }
    if let Some(address) = &body.address {
        studios.edit_address(&mut session, id, address).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_studio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = staff_session(&state).await?;
    state
        .booking
        .studios
        .delete(&mut session, parse_oid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let mut session = staff_session(&state).await?;
    let customers = state.booking.customers.get_all(&mut session).await?;
    Ok(Json(customers.into_iter().map(CustomerDto::from).collect()))
}
