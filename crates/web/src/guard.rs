use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse as _, Redirect, Response};
use axum_extra::extract::CookieJar;
use log::warn;
use model::session::Actor;
use tokio::time::sleep;

use crate::AppState;

pub const AUTH_COOKIE: &str = "auth";
const LOGIN_ROUTE: &str = "/auth/login";

/// Staff route guard: a valid `auth` cookie lets the request through,
/// everything else is redirected to login after a throttle delay. Data-level
/// authorization stays with the storage collaborator.
pub async fn staff_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let Some(cookie) = jar.get(AUTH_COOKIE) else {
        return deny().await;
    };

    if let Err(err) = check(&state, cookie.value()).await {
        warn!("Rejected staff request: {:#}", err);
        return deny().await;
    }

    next.run(request).await
}

async fn check(state: &AppState, key: &str) -> Result<(), eyre::Error> {
    let mut session = state.booking.db.start_session(Actor::Staff).await?;
    state.booking.auth.validate(&mut session, key).await?;
    Ok(())
}

async fn deny() -> Response {
    sleep(Duration::from_secs(1)).await;
    Redirect::to(LOGIN_ROUTE).into_response()
}
