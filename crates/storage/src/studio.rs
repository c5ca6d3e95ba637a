use bson::to_document;
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{session::Session, studio::Studio};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::UpdateOptions,
    Collection,
};

use crate::session::Db;

const COLLECTION: &str = "studios";

#[derive(Clone)]
pub struct StudioStore {
    pub(crate) store: Collection<Studio>,
}

impl StudioStore {
    pub(crate) fn new(db: &Db) -> Self {
        StudioStore {
            store: db.collection(COLLECTION),
        }
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Studio>, Error> {
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
    ) -> Result<Option<Studio>, Error> {
        Ok(self
            .store
            .find_one(doc! { "name": { "$regex": name, "$options": "i" } })
            .session(&mut *session)
            .await?)
    }

    pub async fn get_all(&self, session: &mut Session) -> Result<Vec<Studio>, Error> {
        let mut cursor = self
            .store
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn insert(&self, session: &mut Session, studio: &Studio) -> Result<(), Error> {
        let result = self
            .store
            .update_one(
                doc! { "name": studio.name.clone() },
                doc! { "$setOnInsert": to_document(studio)? },
            )
            .session(&mut *session)
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;
        if result.upserted_id.is_none() {
            return Err(Error::msg("Studio already exists"));
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

    pub async fn update_address(
        &self,
        session: &mut Session,
        id: ObjectId,
        address: &str,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "address": address }, "$inc": { "version": 1 } },
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
