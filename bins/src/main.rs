use eyre::Context;
use log::info;
use relay::{line::LinePush, notify::Notifier, sheets::SheetsExport};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let env = env::Env::load()?;

    info!("connecting to mongo");
    let storage = storage::Storage::new(env.mongo_url())
        .await
        .context("Failed to create storage")?;

    info!("creating booking services");
    let booking = booking::Booking::new(storage.clone(), env.staff_access_key().to_owned());

    let line = LinePush::new(env.line_channel_token().to_owned());
    let sheets = SheetsExport::new(env.sheets_webhook_url().to_owned());
    let notifier = Notifier::new(line, sheets.clone());

    relay::export::start(storage, sheets, env.export_interval_secs());

    info!("Starting server on {}", env.bind_addr());
    web::serve(booking, notifier, env).await?;

    Ok(())
}
