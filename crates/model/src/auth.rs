use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rand::Rng as _;
use serde::{Deserialize, Serialize};

/// Staff session keys older than this are rotated on login.
pub const KEY_TTL_DAYS: i64 = 20;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthKey {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub key: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl AuthKey {
    pub fn gen() -> Self {
        let mut buf = [0u8; 32];
        rand::thread_rng().fill(&mut buf);
        AuthKey {
            id: ObjectId::new(),
            key: hex::encode(buf),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > chrono::Duration::days(KEY_TTL_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_unique_hex() {
        let a = AuthKey::gen();
        let b = AuthKey::gen();
        assert_eq!(a.key.len(), 64);
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn expires_after_ttl() {
        let key = AuthKey::gen();
        assert!(!key.is_expired(Utc::now()));
        assert!(key.is_expired(Utc::now() + chrono::Duration::days(KEY_TTL_DAYS + 1)));
    }
}
