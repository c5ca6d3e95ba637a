use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Studio {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub version: u64,
}

impl Studio {
    pub fn new(name: String, address: String) -> Self {
        Studio {
            id: ObjectId::new(),
            name,
            address,
            version: 0,
        }
    }
}
