use axum::routing::{get, post};
use axum::{middleware, Router};
use booking::Booking;
use env::Env;
use eyre::Result;
use relay::notify::Notifier;

pub mod admin;
pub mod auth;
pub mod error;
pub mod fallback;
pub mod guard;
pub mod reservations;
pub mod schedule;

#[derive(Clone)]
pub struct AppState {
    pub booking: Booking,
    pub notifier: Notifier,
    pub env: Env,
}

pub async fn serve(booking: Booking, notifier: Notifier, env: Env) -> Result<()> {
    let state = AppState {
        booking,
        notifier,
        env: env.clone(),
    };

    let app = Router::new()
        .route("/schedule", get(schedule::range))
        .route("/schedule/week", get(schedule::week))
        .route("/reservations", post(reservations::create))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .nest(
            "/admin",
            admin::routes().layer(middleware::from_fn_with_state(
                state.clone(),
                guard::staff_guard,
            )),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(env.bind_addr()).await?;
    log::debug!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
