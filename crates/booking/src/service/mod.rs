use thiserror::Error;

pub mod auth;
pub mod calendar;
pub mod customers;
pub mod instructors;
pub mod programs;
pub mod reservations;
pub mod studios;

/// Shared error shape for program/instructor/studio management.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Not found")]
    NotFound,
    #[error("Already exists")]
    AlreadyExists,
    #[error("Referenced by upcoming schedules")]
    InUse,
    #[error("Common error:{0}")]
    Common(#[from] eyre::Error),
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(e: mongodb::error::Error) -> Self {
        CatalogError::Common(e.into())
    }
}
