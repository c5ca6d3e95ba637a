use bson::to_document;
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{program::Program, session::Session};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::UpdateOptions,
    Collection,
};

use crate::session::Db;

const COLLECTION: &str = "programs";

#[derive(Clone)]
pub struct ProgramStore {
    pub(crate) store: Collection<Program>,
}

impl ProgramStore {
    pub(crate) fn new(db: &Db) -> Self {
        ProgramStore {
            store: db.collection(COLLECTION),
        }
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Program>, Error> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn get_by_name(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<Option<Program>, Error> {
        Ok(self
            .store
            .find_one(doc! { "name": { "$regex": name, "$options": "i" } })
            .session(&mut *session)
            .await?)
    }

    pub async fn get_all(&self, session: &mut Session) -> Result<Vec<Program>, Error> {
        let mut cursor = self
            .store
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn insert(&self, session: &mut Session, program: &Program) -> Result<(), Error> {
        let result = self
            .store
            .update_one(
                doc! { "name": program.name.clone() },
                doc! { "$setOnInsert": to_document(program)? },
            )
            .session(&mut *session)
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;
        if result.upserted_id.is_none() {
            return Err(Error::msg("Program already exists"));
        }
        Ok(())
    }

    pub async fn update_name(
        &self,
        session: &mut Session,
        id: ObjectId,
        name: &str,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "name": name }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn update_description(
        &self,
        session: &mut Session,
        id: ObjectId,
        description: &str,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "description": description }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn update_capacity(
        &self,
        session: &mut Session,
        id: ObjectId,
        capacity: u32,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "capacity": capacity }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn update_duration(
        &self,
        session: &mut Session,
        id: ObjectId,
        duration_min: u32,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "duration_min": duration_min }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), Error> {
        self.store
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
