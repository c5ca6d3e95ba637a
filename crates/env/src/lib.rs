use std::{env::var, sync::Arc};

use dotenv::dotenv;
use eyre::{Context, Error};

#[derive(Clone)]
pub struct Env(Arc<EnvInner>);

struct EnvInner {
    mongo_url: String,
    bind_addr: String,
    staff_access_key: String,
    line_channel_token: String,
    sheets_webhook_url: String,
    cookie_domain: String,
    demo_fallback: bool,
    export_interval_secs: u64,
}

impl Env {
    pub fn mongo_url(&self) -> &str {
        &self.0.mongo_url
    }

    pub fn bind_addr(&self) -> &str {
        &self.0.bind_addr
    }

    pub fn staff_access_key(&self) -> &str {
        &self.0.staff_access_key
    }

    pub fn line_channel_token(&self) -> &str {
        &self.0.line_channel_token
    }

    pub fn sheets_webhook_url(&self) -> &str {
        &self.0.sheets_webhook_url
    }

    pub fn cookie_domain(&self) -> &str {
        &self.0.cookie_domain
    }

    /// Serve the fixture week when the database is down on public reads.
    pub fn demo_fallback(&self) -> bool {
        self.0.demo_fallback
    }

    pub fn export_interval_secs(&self) -> u64 {
        self.0.export_interval_secs
    }

    pub fn load() -> Result<Env, Error> {
        if let Err(err) = dotenv() {
            log::info!("Failed to load .env file: {}", err);
        }

        Ok(Env(Arc::new(EnvInner {
            mongo_url: var("MONGO_URL").context("MONGO_URL is not set")?,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_owned()),
            staff_access_key: var("STAFF_ACCESS_KEY").context("STAFF_ACCESS_KEY is not set")?,
            line_channel_token: var("LINE_CHANNEL_TOKEN")
                .context("LINE_CHANNEL_TOKEN is not set")?,
            sheets_webhook_url: var("SHEETS_WEBHOOK_URL")
                .context("SHEETS_WEBHOOK_URL is not set")?,
            cookie_domain: var("COOKIE_DOMAIN").unwrap_or_default(),
            demo_fallback: var("DEMO_FALLBACK").map(|v| v == "1").unwrap_or(false),
            export_interval_secs: var("EXPORT_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
        })))
    }
}
