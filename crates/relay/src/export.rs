use std::time::Duration;

use eyre::{eyre, Error};
use log::{error, info};
use model::reservation::Reservation;
use model::session::{Actor, Session};
use storage::Storage;
use tokio::time;

use crate::sheets::{SheetRow, SheetsExport};

const BATCH_LIMIT: i64 = 100;

/// Drains unsynced confirmed reservations to the spreadsheet webhook. A row
/// that fails stays unsynced and is retried on the next tick.
pub fn start(storage: Storage, sheets: SheetsExport, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            if let Err(err) = process(&storage, &sheets).await {
                error!("Error in export process: {:#}", err);
            }
        }
    });
}

async fn process(storage: &Storage, sheets: &SheetsExport) -> Result<(), Error> {
    let mut session = storage.db.start_session(Actor::System).await?;
    let pending = storage
        .reservations
        .find_unsynced(&mut session, BATCH_LIMIT)
        .await?;
    if pending.is_empty() {
        return Ok(());
    }

    info!("Exporting {} reservation(s)", pending.len());
    for reservation in pending {
        if let Err(err) = export_row(storage, sheets, &mut session, &reservation).await {
            error!("Failed to export reservation {}: {:#}", reservation.id, err);
        }
    }
    Ok(())
}

async fn export_row(
    storage: &Storage,
    sheets: &SheetsExport,
    session: &mut Session,
    reservation: &Reservation,
) -> Result<(), Error> {
    let schedule = storage
        .schedules
        .get_by_id(session, reservation.schedule_id)
        .await?
        .ok_or_else(|| eyre!("Schedule not found:{}", reservation.schedule_id))?;
    let customer = storage
        .customers
        .get_by_id(session, reservation.customer_id)
        .await?
        .ok_or_else(|| eyre!("Customer not found:{}", reservation.customer_id))?;
    let program = storage
        .programs
        .get_by_id(session, schedule.program_id)
        .await?
        .ok_or_else(|| eyre!("Program not found:{}", schedule.program_id))?;

    let row = SheetRow::new(reservation, &schedule, &customer, &program);
    sheets.append(&row).await?;
    storage
        .reservations
        .mark_synced(session, reservation.id, true)
        .await?;
    Ok(())
}
