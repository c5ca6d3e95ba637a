use chrono::Utc;
use log::warn;
use model::auth::AuthKey;
use model::session::Session;
use storage::auth_key::AuthKeys;
use thiserror::Error;
use tx_macro::tx;

/// Staff login: the configured access key buys a stored session key, which
/// the web layer carries in a cookie. Keys expire after
/// [`model::auth::KEY_TTL_DAYS`].
#[derive(Clone)]
pub struct AuthService {
    auth_keys: AuthKeys,
    access_key: String,
}

impl AuthService {
    pub(crate) fn new(auth_keys: AuthKeys, access_key: String) -> Self {
        AuthService {
            auth_keys,
            access_key,
        }
    }

    #[tx]
    pub async fn login(&self, session: &mut Session, access_key: &str) -> Result<AuthKey, AuthError> {
        if access_key != self.access_key {
            warn!("Login attempt with a wrong access key");
            return Err(AuthError::InvalidAccessKey);
        }
        let key = AuthKey::gen();
        self.auth_keys.insert(session, &key).await?;
        Ok(key)
    }

    /// Validates a session key, dropping it once past its TTL.
    pub async fn validate(&self, session: &mut Session, key: &str) -> Result<(), AuthError> {
        let auth_key = self
            .auth_keys
            .get_by_key(session, key)
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        if auth_key.is_expired(Utc::now()) {
            self.auth_keys.delete_by_key(session, key).await?;
            return Err(AuthError::SessionExpired);
        }
        Ok(())
    }

    pub async fn logout(&self, session: &mut Session, key: &str) -> Result<(), AuthError> {
        self.auth_keys.delete_by_key(session, key).await?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid access key")]
    InvalidAccessKey,
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session expired")]
    SessionExpired,
    #[error("Common error:{0}")]
    Common(#[from] eyre::Error),
}

impl From<mongodb::error::Error> for AuthError {
    fn from(e: mongodb::error::Error) -> Self {
        AuthError::Common(e.into())
    }
}
