use chrono::Utc;
use eyre::Result;
use futures_util::TryStreamExt as _;
use log::info;
use model::{
    ids::DayId,
    schedule::{Schedule, ScheduleFilter},
    session::Session,
};
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::session::Db;

const COLLECTION: &str = "schedules";

#[derive(Clone)]
pub struct ScheduleStore {
    pub(crate) store: Collection<Schedule>,
}

impl ScheduleStore {
    pub(crate) async fn new(db: &Db) -> Result<Self> {
        let store: Collection<Schedule> = db.collection(COLLECTION);
        store
            .create_index(IndexModel::builder().keys(doc! { "start_at": 1 }).build())
            .await?;
        store
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "studio_id": 1, "start_at": 1 })
                    .build(),
            )
            .await?;
        store
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "recurring_group_id": 1 })
                    .build(),
            )
            .await?;
        Ok(ScheduleStore { store })
    }

    pub async fn insert(&self, session: &mut Session, schedule: &Schedule) -> Result<()> {
        info!("Add schedule: {:?}", schedule);
        self.store
            .insert_one(schedule)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn insert_many(&self, session: &mut Session, schedules: &[Schedule]) -> Result<()> {
        info!("Add {} schedules", schedules.len());
        self.store
            .insert_many(schedules)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Schedule>> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    /// Non-cancelled schedules in `[from, to)`, ordered by start time.
    pub async fn find_range(
        &self,
        session: &mut Session,
        from: DayId,
        to: DayId,
    ) -> Result<Vec<Schedule>> {
        let filter = doc! {
            "start_at": { "$gte": from.id(), "$lt": to.id() },
            "is_canceled": { "$ne": true },
        };
        let mut cursor = self
            .store
            .find(filter)
            .sort(doc! { "start_at": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    /// Non-cancelled schedules of one studio on one day.
    pub async fn find_day_for_studio(
        &self,
        session: &mut Session,
        day: DayId,
        studio_id: ObjectId,
    ) -> Result<Vec<Schedule>> {
        let filter = doc! {
            "studio_id": studio_id,
            "start_at": { "$gte": day.id(), "$lt": day.next().id() },
            "is_canceled": { "$ne": true },
        };
        let mut cursor = self.store.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn find_by_group(
        &self,
        session: &mut Session,
        group_id: ObjectId,
    ) -> Result<Vec<Schedule>> {
        let mut cursor = self
            .store
            .find(doc! { "recurring_group_id": group_id })
            .sort(doc! { "start_at": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn set_cancel_flag(
        &self,
        session: &mut Session,
        id: ObjectId,
        flag: bool,
    ) -> Result<()> {
        info!("Set cancel flag: {} {}", id, flag);
        let update = doc! { "$set": { "is_canceled": flag }, "$inc": { "version": 1 } };
        let result = self
            .store
            .update_one(doc! { "_id": id }, update)
            .session(&mut *session)
            .await?;
        if result.modified_count == 0 {
            return Err(eyre::eyre!("Schedule not found"));
        }
        Ok(())
    }

    pub async fn set_instructor(
        &self,
        session: &mut Session,
        id: ObjectId,
        instructor_id: ObjectId,
    ) -> Result<()> {
        info!("Change instructor: {} {}", id, instructor_id);
        let update = doc! { "$set": { "instructor_id": instructor_id }, "$inc": { "version": 1 } };
        let result = self
            .store
            .update_one(doc! { "_id": id }, update)
            .session(&mut *session)
            .await?;
        if result.modified_count == 0 {
            return Err(eyre::eyre!("Schedule not found"));
        }
        Ok(())
    }

    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<()> {
        info!("Delete schedule: {}", id);
        let result = self
            .store
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        if result.deleted_count != 1 {
            return Err(eyre::eyre!("Schedule not found"));
        }
        Ok(())
    }

    /// Removes every member of a recurring group. Returns the removed count.
    pub async fn delete_group(&self, session: &mut Session, group_id: ObjectId) -> Result<u64> {
        info!("Delete recurring group: {}", group_id);
        let result = self
            .store
            .delete_many(doc! { "recurring_group_id": group_id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count)
    }

    /// Whether any non-cancelled schedule in the future references the entity.
    pub async fn has_future_ref(
        &self,
        session: &mut Session,
        filter: ScheduleFilter,
    ) -> Result<bool> {
        let key = match filter {
            ScheduleFilter::Program(id) => doc! { "program_id": id },
            ScheduleFilter::Instructor(id) => doc! { "instructor_id": id },
            ScheduleFilter::Studio(id) => doc! { "studio_id": id },
        };
        let mut find = doc! {
            "start_at": { "$gte": Utc::now() },
            "is_canceled": { "$ne": true },
        };
        find.extend(key);
        Ok(self
            .store
            .find_one(find)
            .session(&mut *session)
            .await?
            .is_some())
    }

    pub async fn update_program_fields(
        &self,
        session: &mut Session,
        program_id: ObjectId,
        capacity: Option<u32>,
        duration_min: Option<u32>,
    ) -> Result<()> {
        let mut set = doc! {};
        if let Some(capacity) = capacity {
            set.insert("capacity", capacity);
        }
        if let Some(duration_min) = duration_min {
            set.insert("duration_min", duration_min);
        }
        if set.is_empty() {
            return Ok(());
        }
        self.store
            .update_many(
                doc! {
                    "program_id": program_id,
                    "start_at": { "$gte": Utc::now() },
                },
                doc! { "$set": set, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
