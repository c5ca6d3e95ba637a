use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Instructor {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub version: u64,
}

impl Instructor {
    pub fn new(name: String, bio: String) -> Self {
        Instructor {
            id: ObjectId::new(),
            name,
            bio,
            version: 0,
        }
    }
}
