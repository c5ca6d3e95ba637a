use std::ops::Deref;

use chrono::Local;
use log::info;
use model::customer::sanitize_phone;
use model::reservation::{Reservation, ReservationStatus};
use model::schedule::{Schedule, ScheduleStatus};
use model::session::Session;
use mongodb::bson::oid::ObjectId;
use storage::reservation::ReservationStore;
use storage::schedule::ScheduleStore;
use thiserror::Error;
use tx_macro::tx;

use super::customers::Customers;

#[derive(Clone)]
pub struct Reservations {
    reservations: ReservationStore,
    schedules: ScheduleStore,
    customers: Customers,
}

#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub schedule_id: ObjectId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub line_user_id: Option<String>,
}

/// The capacity guard: a spot is free while confirmed bookings stay below
/// capacity.
pub fn has_free_slot(capacity: u32, confirmed: u64) -> bool {
    confirmed < capacity as u64
}

impl Reservations {
    pub(crate) fn new(
        reservations: ReservationStore,
        schedules: ScheduleStore,
        customers: Customers,
    ) -> Self {
        Reservations {
            reservations,
            schedules,
            customers,
        }
    }

    /// Books a spot. The whole guard chain and the insert run in one
    /// transaction, so two requests racing for the last spot cannot both
    /// succeed.
    #[tx]
    pub async fn reserve(
        &self,
        session: &mut Session,
        request: ReservationRequest,
    ) -> Result<(Reservation, Schedule), ReserveError> {
        if request.name.trim().is_empty() || sanitize_phone(&request.phone).is_empty() {
            return Err(ReserveError::InvalidContact);
        }

        let schedule = self
            .schedules
            .get_by_id(session, request.schedule_id)
            .await?
            .ok_or(ReserveError::ScheduleNotFound)?;
        let status = schedule.status(Local::now());
        if !status.can_book() {
            return Err(ReserveError::NotOpenToBooking(status));
        }

        let customer = self
            .customers
            .get_or_create(
                session,
                &request.name,
                &request.phone,
                request.email.as_deref(),
                request.line_user_id.as_deref(),
            )
            .await?;

        if self
            .reservations
            .find_active(session, schedule.id, customer.id)
            .await?
            .is_some()
        {
            return Err(ReserveError::AlreadyReserved);
        }

        let confirmed = self.reservations.count_confirmed(session, schedule.id).await?;
        if !has_free_slot(schedule.capacity, confirmed) {
            return Err(ReserveError::CapacityExceeded);
        }

        let reservation = Reservation::new(schedule.id, customer.id, ReservationStatus::Confirmed);
        self.reservations.insert(session, &reservation).await?;
        info!(
            "Reserved {}/{} for schedule {}",
            confirmed + 1,
            schedule.capacity,
            schedule.id
        );
        Ok((reservation, schedule))
    }

    #[tx]
    pub async fn cancel(&self, session: &mut Session, id: ObjectId) -> Result<(), ReserveError> {
        let reservation = self
            .reservations
            .get_by_id(session, id)
            .await?
            .ok_or(ReserveError::ReservationNotFound)?;
        if !reservation.is_active() {
            return Err(ReserveError::AlreadyCancelled);
        }
        self.reservations
            .set_status(session, id, ReservationStatus::Cancelled)
            .await?;
        Ok(())
    }

    /// Staff status override. Cancelled stays terminal; confirming a pending
    /// hold re-runs the capacity guard.
    #[tx]
    pub async fn update_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: ReservationStatus,
    ) -> Result<(), ReserveError> {
        let reservation = self
            .reservations
            .get_by_id(session, id)
            .await?
            .ok_or(ReserveError::ReservationNotFound)?;
        if !reservation.is_active() {
            return Err(ReserveError::AlreadyCancelled);
        }
        if status.counts_against_capacity() && !reservation.status.counts_against_capacity() {
            let schedule = self
                .schedules
                .get_by_id(session, reservation.schedule_id)
                .await?
                .ok_or(ReserveError::ScheduleNotFound)?;
            let confirmed = self
                .reservations
                .count_confirmed(session, schedule.id)
                .await?;
            if !has_free_slot(schedule.capacity, confirmed) {
                return Err(ReserveError::CapacityExceeded);
            }
        }
        self.reservations.set_status(session, id, status).await?;
        Ok(())
    }
}

impl Deref for Reservations {
    type Target = ReservationStore;

    fn deref(&self) -> &Self::Target {
        &self.reservations
    }
}

#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("Schedule not found")]
    ScheduleNotFound,
    #[error("Reservation not found")]
    ReservationNotFound,
    #[error("Schedule is not open to booking:{0:?}")]
    NotOpenToBooking(ScheduleStatus),
    #[error("Customer already has an active reservation")]
    AlreadyReserved,
    #[error("No free spots left")]
    CapacityExceeded,
    #[error("Reservation is already cancelled")]
    AlreadyCancelled,
    #[error("Name and phone are required")]
    InvalidContact,
    #[error("Common error:{0}")]
    Common(#[from] eyre::Error),
}

impl From<mongodb::error::Error> for ReserveError {
    fn from(e: mongodb::error::Error) -> Self {
        ReserveError::Common(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_admits_below_capacity() {
        assert!(has_free_slot(1, 0));
        assert!(has_free_slot(8, 7));
    }

    #[test]
    fn guard_rejects_at_capacity() {
        assert!(!has_free_slot(1, 1));
        assert!(!has_free_slot(8, 8));
        assert!(!has_free_slot(0, 0));
    }

    #[test]
    fn guard_rejects_over_capacity() {
        assert!(!has_free_slot(1, 2));
    }
}
