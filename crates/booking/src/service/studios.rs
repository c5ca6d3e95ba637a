use std::ops::Deref;

use model::schedule::ScheduleFilter;
use model::session::Session;
use model::studio::Studio;
use mongodb::bson::oid::ObjectId;
use storage::schedule::ScheduleStore;
use storage::studio::StudioStore;
use tx_macro::tx;

use super::CatalogError;

#[derive(Clone)]
pub struct Studios {
    store: StudioStore,
    schedules: ScheduleStore,
}

impl Studios {
    pub(crate) fn new(store: StudioStore, schedules: ScheduleStore) -> Self {
        Studios { store, schedules }
    }

    #[tx]
    pub async fn create(
        &self,
        session: &mut Session,
        name: String,
        address: String,
    ) -> Result<Studio, CatalogError> {
        if self.store.get_by_name(session, &name).await?.is_some() {
            return Err(CatalogError::AlreadyExists);
        }
        let studio = Studio::new(name, address);
        self.store.insert(session, &studio).await?;
        Ok(studio)
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

    pub async fn edit_address(
        &self,
        session: &mut Session,
        id: ObjectId,
        address: &str,
    ) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        self.store.update_address(session, id, address).await?;
        Ok(())
    }

    #[tx]
    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), CatalogError> {
        self.require(session, id).await?;
        if self
            .schedules
            .has_future_ref(session, ScheduleFilter::Studio(id))
            .await?
        {
            return Err(CatalogError::InUse);
        }
        self.store.delete(session, id).await?;
        Ok(())
    }

    async fn require(&self, session: &mut Session, id: ObjectId) -> Result<Studio, CatalogError> {
        self.store
            .get_by_id(session, id)
            .await?
            .ok_or(CatalogError::NotFound)
    }
}

impl Deref for Studios {
    type Target = StudioStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
