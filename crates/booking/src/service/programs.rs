use std::ops::Deref;

use model::program::Program;
use model::schedule::ScheduleFilter;
use model::session::Session;
use mongodb::bson::oid::ObjectId;
use storage::program::ProgramStore;
use storage::schedule::ScheduleStore;
use tx_macro::tx;

use super::CatalogError;

#[derive(Clone)]
pub struct Programs {
    store: ProgramStore,
    schedules: ScheduleStore,
}

impl Programs {
    pub(crate) fn new(store: ProgramStore, schedules: ScheduleStore) -> Self {
        Programs { store, schedules }
    }

    #[tx]
    pub async fn create(
        &self,
        session: &mut Session,
        name: String,
        description: String,
        duration_min: u32,
        capacity: u32,
    ) -> Result<Program, CatalogError> {
        if self.store.get_by_name(session, &name).await?.is_some() {
            return Err(CatalogError::AlreadyExists);
        }
        let program = Program::new(name, description, duration_min, capacity);
        self.store.insert(session, &program).await?;
        Ok(program)
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

    pub async fn edit_description(
        &self,
        session: &mut Session,
        id: ObjectId,
        description: &str,
    ) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        self.store.update_description(session, id, description).await?;
        Ok(())
    }

    /// Capacity applies to the program and to its upcoming schedules.
    #[tx]
    pub async fn edit_capacity(
        &self,
        session: &mut Session,
        id: ObjectId,
        capacity: u32,
    ) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        self.store.update_capacity(session, id, capacity).await?;
        self.schedules
            .update_program_fields(session, id, Some(capacity), None)
            .await?;
        Ok(())
    }

    #[tx]
    pub async fn edit_duration(
        &self,
        session: &mut Session,
        id: ObjectId,
        duration_min: u32,
    ) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        self.store.update_duration(session, id, duration_min).await?;
        self.schedules
            .update_program_fields(session, id, None, Some(duration_min))
            .await?;
        Ok(())
    }

    #[tx]
    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        if self
            .schedules
            .has_future_ref(session, ScheduleFilter::Program(id))
            .await?
        {
            return Err(CatalogError::InUse);
        }
        self.store.delete(session, id).await?;
        Ok(())
    }

    async fn require(&self, session: &mut Session, id: ObjectId) -> Result<Program, CatalogError> {
        self.store
            .get_by_id(session, id)
            .await?
            .ok_or(CatalogError::NotFound)
    }
}

impl Deref for Programs {
    type Target = ProgramStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
