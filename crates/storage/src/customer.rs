use eyre::Error;
use futures_util::TryStreamExt as _;
use log::info;
use model::{customer::Customer, session::Session};
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::session::Db;

const COLLECTION: &str = "customers";

#[derive(Clone)]
pub struct CustomerStore {
    pub(crate) store: Collection<Customer>,
}

impl CustomerStore {
    pub(crate) async fn new(db: &Db) -> Result<Self, Error> {
        let store: Collection<Customer> = db.collection(COLLECTION);
        store
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "phone": 1 })
                    .options(mongodb::options::IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        Ok(CustomerStore { store })
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<Customer>, Error> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    /// Phone must already be sanitized.
    pub async fn get_by_phone(
        &self,
        session: &mut Session,
        phone: &str,
    ) -> Result<Option<Customer>, Error> {
        Ok(self
            .store
            .find_one(doc! { "phone": phone })
            .session(&mut *session)
            .await?)
    }

    pub async fn get_all(&self, session: &mut Session) -> Result<Vec<Customer>, Error> {
        let mut cursor = self
            .store
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn insert(&self, session: &mut Session, customer: &Customer) -> Result<(), Error> {
        info!("Add customer: {:?}", customer);
        self.store
            .insert_one(customer)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn update_contact(
        &self,
        session: &mut Session,
        id: ObjectId,
        name: &str,
        email: Option<&str>,
        line_user_id: Option<&str>,
    ) -> Result<(), Error> {
        let mut set = doc! { "name": name };
        if let Some(email) = email {
            set.insert("email", email);
        }
        if let Some(line_user_id) = line_user_id {
            set.insert("line_user_id", line_user_id);
        }
        self.store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": set, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
