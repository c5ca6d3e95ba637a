use bson::to_document;
use eyre::Error;
use futures_util::TryStreamExt as _;
use model::{instructor::Instructor, session::Session};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::UpdateOptions,
    Collection,
};

use crate::session::Db;

const COLLECTION: &str = "instructors";

#[derive(Clone)]
pub struct InstructorStore {
    pub(crate) store: Collection<Instructor>,
}

impl InstructorStore {
    pub(crate) fn new(db: &Db) -> Self {
        InstructorStore {
            store: db.collection(COLLECTION),
        }
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Instructor>, Error> {
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
    ) -> Result<Option<Instructor>, Error> {
        Ok(self
            .store
            .find_one(doc! { "name": { "$regex": name, "$options": "i" } })
            .session(&mut *session)
            .await?)
    }

    pub async fn get_all(&self, session: &mut Session) -> Result<Vec<Instructor>, Error> {
        let mut cursor = self
            .store
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn insert(&self, session: &mut Session, instructor: &Instructor) -> Result<(), Error> {
        let result = self
            .store
            .update_one(
                doc! { "name": instructor.name.clone() },
                doc! { "$setOnInsert": to_document(instructor)? },
            )
            .session(&mut *session)
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await?;
        if result.upserted_id.is_none() {
            return Err(Error::msg("Instructor already exists"));
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

    pub async fn update_bio(
        &self,
        session: &mut Session,
        id: ObjectId,
        bio: &str,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "bio": bio }, "$inc": { "version": 1 } },
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
