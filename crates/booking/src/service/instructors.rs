use std::ops::Deref;

use model::instructor::Instructor;
use model::schedule::ScheduleFilter;
use model::session::Session;
use mongodb::bson::oid::ObjectId;
use storage::instructor::InstructorStore;
use storage::schedule::ScheduleStore;
use tx_macro::tx;

use super::CatalogError;

#[derive(Clone)]
pub struct Instructors {
    store: InstructorStore,
    schedules: ScheduleStore,
}

impl Instructors {
    pub(crate) fn new(store: InstructorStore, schedules: ScheduleStore) -> Self {
        Instructors { store, schedules }
    }

    #[tx]
    pub async fn create(
        &self,
        session: &mut Session,
        name: String,
        bio: String,
    ) -> Result<Instructor, CatalogError> {
        if self.store.get_by_name(session, &name).await?.is_some() {
            return Err(CatalogError::AlreadyExists);
        }
        let instructor = Instructor::new(name, bio);
        self.store.insert(session, &instructor).await?;
        Ok(instructor)
    }

    pub async fn edit_name(
        &self,
        session: &mut Session,
        id: ObjectId,
        name: &str,
    ) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        self.store.update_name(session, id, name).await?;
        Ok(())
    }

    pub async fn edit_bio(
        &self,
        session: &mut Session,
        id: ObjectId,
        bio: &str,
    ) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        self.store.update_bio(session, id, bio).await?;
        Ok(())
    }

    /// An instructor with upcoming classes cannot be removed.
    #[tx]
    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        if self
            .schedules
            .has_future_ref(session, ScheduleFilter::Instructor(id))
            .await?
        {
            return Err(CatalogError::InUse);
        }
        self.store.delete(session, id).await?;
        Ok(())
    }

    async fn require(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Instructor, CatalogError> {
        self.store
            .get_by_id(session, id)
            .await?
            .ok_or(CatalogError::NotFound)
    }
}

impl Deref for Instructors {
    type Target = InstructorStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
