use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Digits only, see [`sanitize_phone`].
    pub phone: String,
    pub email: Option<String>,
    pub line_user_id: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Customer {
    pub fn new(
        name: String,
        phone: &str,
        email: Option<String>,
        line_user_id: Option<String>,
    ) -> Self {
        Customer {
            id: ObjectId::new(),
            name,
            phone: sanitize_phone(phone),
            email,
            line_user_id,
            created_at: Utc::now(),
            version: 0,
        }
    }
}

pub fn sanitize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_formatting() {
        assert_eq!(sanitize_phone("+81 90-1234-5678"), "819012345678");
        assert_eq!(sanitize_phone("090 1234 5678"), "09012345678");
        assert_eq!(sanitize_phone("09012345678"), "09012345678");
    }
}
