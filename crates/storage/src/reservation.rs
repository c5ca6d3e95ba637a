use std::collections::HashMap;

use chrono::Utc;
use eyre::Result;
use futures_util::TryStreamExt as _;
use log::info;
use model::{
    reservation::{Reservation, ReservationStatus},
    session::Session,
};
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::session::Db;

const COLLECTION: &str = "reservations";

#[derive(Clone)]
pub struct ReservationStore {
    pub(crate) store: Collection<Reservation>,
}

impl ReservationStore {
    pub(crate) async fn new(db: &Db) -> Result<Self> {
        let store: Collection<Reservation> = db.collection(COLLECTION);
        store
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "schedule_id": 1, "status": 1 })
                    .build(),
            )
            .await?;
        store
            .create_index(IndexModel::builder().keys(doc! { "customer_id": 1 }).build())
            .await?;
        store
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "synced": 1, "status": 1 })
                    .build(),
            )
            .await?;
        Ok(ReservationStore { store })
    }

    pub async fn insert(&self, session: &mut Session, reservation: &Reservation) -> Result<()> {
        info!("Add reservation: {:?}", reservation);
        self.store
            .insert_one(reservation)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Reservation>> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn count_confirmed(&self, session: &mut Session, schedule_id: ObjectId) -> Result<u64> {
        Ok(self
            .store
            .count_documents(doc! {
                "schedule_id": schedule_id,
                "status": ReservationStatus::Confirmed.to_string(),
            })
            .session(&mut *session)
            .await?)
    }

    /// Confirmed counts for a batch of schedules in one query.
    pub async fn count_confirmed_many(
        &self,
        session: &mut Session,
        schedule_ids: &[ObjectId],
    ) -> Result<HashMap<ObjectId, u64>> {
        let filter = doc! {
            "schedule_id": { "$in": schedule_ids.to_vec() },
            "status": ReservationStatus::Confirmed.to_string(),
        };
        let mut cursor = self.store.find(filter).session(&mut *session).await?;
        let mut counts = HashMap::new();
        let mut stream = cursor.stream(&mut *session);
        while let Some(reservation) = stream.try_next().await? {
            *counts.entry(reservation.schedule_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub async fn find_active(
        &self,
        session: &mut Session,
        schedule_id: ObjectId,
        customer_id: ObjectId,
    ) -> Result<Option<Reservation>> {
        Ok(self
            .store
            .find_one(doc! {
                "schedule_id": schedule_id,
                "customer_id": customer_id,
                "status": { "$ne": ReservationStatus::Cancelled.to_string() },
            })
            .session(&mut *session)
            .await?)
    }

    pub async fn find_by_schedule(
        &self,
        session: &mut Session,
        schedule_id: ObjectId,
    ) -> Result<Vec<Reservation>> {
        let mut cursor = self
            .store
            .find(doc! { "schedule_id": schedule_id })
            .sort(doc! { "created_at": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn find_by_customer(
        &self,
        session: &mut Session,
        customer_id: ObjectId,
    ) -> Result<Vec<Reservation>> {
        let mut cursor = self
            .store
            .find(doc! { "customer_id": customer_id })
            .sort(doc! { "created_at": -1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn set_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: ReservationStatus,
    ) -> Result<()> {
        info!("Set reservation status: {} {}", id, status);
        let update = doc! {
            "$set": { "status": status.to_string(), "updated_at": Utc::now() },
            "$inc": { "version": 1 },
        };
        let result = self
            .store
            .update_one(doc! { "_id": id }, update)
            .session(&mut *session)
            .await?;
        if result.matched_count == 0 {
            return Err(eyre::eyre!("Reservation not found"));
        }
        Ok(())
    }

    pub async fn mark_synced(&self, session: &mut Session, id: ObjectId, flag: bool) -> Result<()> {
        let update = doc! {
            "$set": { "synced": flag, "updated_at": Utc::now() },
            "$inc": { "version": 1 },
        };
        let result = self
            .store
            .update_one(doc! { "_id": id }, update)
            .session(&mut *session)
            .await?;
        if result.matched_count == 0 {
            return Err(eyre::eyre!("Reservation not found"));
        }
        Ok(())
    }

    pub async fn find_unsynced(&self, session: &mut Session, limit: i64) -> Result<Vec<Reservation>> {
        let mut cursor = self
            .store
            .find(doc! {
                "synced": false,
                "status": ReservationStatus::Confirmed.to_string(),
            })
            .sort(doc! { "created_at": 1 })
            .limit(limit)
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    /// Cascade for recurring-group deletion.
    pub async fn delete_by_schedules(
        &self,
        session: &mut Session,
        schedule_ids: &[ObjectId],
    ) -> Result<u64> {
        info!("Delete reservations for {} schedules", schedule_ids.len());
        let result = self
            .store
            .delete_many(doc! { "schedule_id": { "$in": schedule_ids.to_vec() } })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count)
    }
}
