use bson::doc;
use eyre::Error;
use model::{auth::AuthKey, session::Session};
use mongodb::{Collection, IndexModel};

use crate::session::Db;

const COLLECTION: &str = "auth_keys";

#[derive(Clone)]
pub struct AuthKeys {
    pub(crate) store: Collection<AuthKey>,
}

impl AuthKeys {
    pub(crate) async fn new(db: &Db) -> Result<Self, Error> {
        let store: Collection<AuthKey> = db.collection(COLLECTION);
        store
            .create_index(IndexModel::builder().keys(doc! { "key": 1 }).build())
            .await?;
        Ok(AuthKeys { store })
    }

    pub async fn insert(&self, session: &mut Session, key: &AuthKey) -> Result<(), Error> {
        self.store.insert_one(key).session(&mut *session).await?;
        Ok(())
    }

    pub async fn get_by_key(
        &self,
        session: &mut Session,
        key: &str,
    ) -> Result<Option<AuthKey>, Error> {
        Ok(self
            .store
            .find_one(doc! { "key": key })
            .session(&mut *session)
            .await?)
    }

    pub async fn delete_by_key(&self, session: &mut Session, key: &str) -> Result<(), Error> {
        self.store
            .delete_one(doc! { "key": key })
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
