use log::error;
use model::customer::Customer;
use model::program::Program;
use model::reservation::Reservation;
use model::schedule::Schedule;
use model::slot::Slot;

use crate::line::LinePush;
use crate::sheets::{SheetRow, SheetsExport};

/// Best-effort fan-out after a committed reservation. Failures are logged
/// and swallowed; the reservation itself is already durable.
#[derive(Clone)]
pub struct Notifier {
    line: LinePush,
    sheets: SheetsExport,
}

impl Notifier {
    pub fn new(line: LinePush, sheets: SheetsExport) -> Self {
        Notifier { line, sheets }
    }

    pub async fn reservation_created(
        &self,
        reservation: &Reservation,
        schedule: &Schedule,
        customer: &Customer,
        program: &Program,
    ) {
        if let Some(line_user_id) = &customer.line_user_id {
            let text = booking_confirmation(&customer.name, &schedule.slot(), &program.name);
            if let Err(err) = self.line.push_text(line_user_id, text).await {
                error!("Failed to push LINE confirmation: {:#}", err);
            }
        }

        let row = SheetRow::new(reservation, schedule, customer, program);
        if let Err(err) = self.sheets.append(&row).await {
            error!("Failed to post reservation row: {:#}", err);
        }
    }
}

pub fn booking_confirmation(name: &str, slot: &Slot, program: &str) -> String {
    format!(
        "{name}様\nご予約を承りました。\n\n{program}\n{date} {start}〜{end}\n\n当日お待ちしております。",
        date = slot.start_at().format("%Y/%m/%d"),
        start = slot.start_at().format("%H:%M"),
        end = slot.end_at().format("%H:%M"),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    #[test]
    fn confirmation_carries_name_program_and_slot() {
        let slot = Slot::new(
            Utc.with_ymd_and_hms(2025, 7, 1, 1, 30, 0).single().unwrap(),
            60,
        );
        let text = booking_confirmation("Tanaka", &slot, "Trial Yoga");
        assert!(text.contains("Tanaka様"));
        assert!(text.contains("Trial Yoga"));
        assert!(text.contains(&slot.start_at().format("%Y/%m/%d").to_string()));
        assert!(text.contains(&slot.start_at().format("%H:%M").to_string()));
    }
}
