use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use model::session::Actor;
use serde::Deserialize;
use tokio::time::sleep;

use crate::error::ApiError;
use crate::guard::AUTH_COOKIE;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub access_key: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Json(body): axum::Json<LoginRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let mut session = state.booking.db.start_session(Actor::Anonymous).await?;
    let key = match state.booking.auth.login(&mut session, &body.access_key).await {
        Ok(key) => key,
        Err(err) => {
            sleep(Duration::from_secs(1)).await;
            return Err(err.into());
        }
    };

    let cookie = Cookie::build((AUTH_COOKIE, key.key))
        .http_only(true)
        .secure(true)
        .path("/")
        .domain(state.env.cookie_domain().to_owned())
        .same_site(SameSite::Strict)
        .build();
    Ok((jar.add(cookie), StatusCode::NO_CONTENT))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        let mut session = state.booking.db.start_session(Actor::Staff).await?;
        state.booking.auth.logout(&mut session, cookie.value()).await?;
    }
    Ok((jar.remove(Cookie::from(AUTH_COOKIE)), StatusCode::NO_CONTENT))
}
