use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reservation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub schedule_id: ObjectId,
    pub customer_id: ObjectId,
    pub status: ReservationStatus,
    /// Exported to the spreadsheet relay.
    #[serde(default)]
    pub synced: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Reservation {
    pub fn new(schedule_id: ObjectId, customer_id: ObjectId, status: ReservationStatus) -> Self {
        let now = Utc::now();
        Reservation {
            id: ObjectId::new(),
            schedule_id,
            customer_id,
            status,
            synced: false,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Active reservations hold a spot; only confirmed ones count
    /// against capacity.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, ReservationStatus::Cancelled)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn counts_against_capacity(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_confirmed_counts_against_capacity() {
        assert!(ReservationStatus::Confirmed.counts_against_capacity());
        assert!(!ReservationStatus::Pending.counts_against_capacity());
        assert!(!ReservationStatus::Cancelled.counts_against_capacity());
    }

    #[test]
    fn cancelled_is_not_active() {
        let mut reservation =
            Reservation::new(ObjectId::new(), ObjectId::new(), ReservationStatus::Confirmed);
        assert!(reservation.is_active());
        reservation.status = ReservationStatus::Cancelled;
        assert!(!reservation.is_active());
    }
}
