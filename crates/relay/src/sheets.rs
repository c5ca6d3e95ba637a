use eyre::Error;
use model::customer::Customer;
use model::program::Program;
use model::reservation::Reservation;
use model::schedule::Schedule;
use serde::{Deserialize, Serialize};

/// Spreadsheet webhook client. The receiving script appends one row per
/// posted record.
#[derive(Clone)]
pub struct SheetsExport {
    client: reqwest::Client,
    webhook_url: String,
}

/// Flat export record, one spreadsheet row.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow {
    pub customer_name: String,
    pub experience_date: String,
    pub time_slot: String,
    pub program_name: String,
    pub phone: String,
    pub email: String,
    pub status: String,
}

impl SheetRow {
    pub fn new(
        reservation: &Reservation,
        schedule: &Schedule,
        customer: &Customer,
        program: &Program,
    ) -> Self {
        let slot = schedule.slot();
        SheetRow {
            customer_name: customer.name.clone(),
            experience_date: slot.start_at().format("%Y-%m-%d").to_string(),
            time_slot: format!(
                "{}-{}",
                slot.start_at().format("%H:%M"),
                slot.end_at().format("%H:%M")
            ),
            program_name: program.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone().unwrap_or_default(),
            status: reservation.status.to_string(),
        }
    }
}

impl SheetsExport {
    pub fn new(webhook_url: String) -> Self {
        SheetsExport {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub async fn append(&self, row: &SheetRow) -> Result<(), Error> {
        let response = self.client.post(&self.webhook_url).json(row).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(eyre::eyre!("Sheet webhook failed:{} {}", status, body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone as _};
    use model::reservation::ReservationStatus;
    use mongodb::bson::oid::ObjectId;

    use super::*;

    #[test]
    fn row_is_built_from_the_reservation_chain() {
        let program = Program::new("Trial Yoga".to_owned(), String::new(), 60, 8);
        let schedule = Schedule::new(
            program.id,
            ObjectId::new(),
            ObjectId::new(),
            Local.with_ymd_and_hms(2025, 7, 1, 10, 30, 0).single().unwrap(),
            60,
            8,
            None,
        );
        let customer = Customer::new(
            "Tanaka".to_owned(),
            "+81 90-1234-5678",
            Some("tanaka@example.com".to_owned()),
            None,
        );
        let reservation =
            Reservation::new(schedule.id, customer.id, ReservationStatus::Confirmed);

        let row = SheetRow::new(&reservation, &schedule, &customer, &program);
        assert_eq!(row.customer_name, "Tanaka");
        assert_eq!(row.experience_date, "2025-07-01");
        assert_eq!(row.time_slot, "10:30-11:30");
        assert_eq!(row.program_name, "Trial Yoga");
        assert_eq!(row.phone, "819012345678");
        assert_eq!(row.status, "confirmed");
    }

    #[test]
    fn row_wire_shape_is_camel_case() {
        let row = SheetRow {
            customer_name: "Tanaka".to_owned(),
            experience_date: "2025-07-01".to_owned(),
            time_slot: "10:30-11:30".to_owned(),
            program_name: "Trial Yoga".to_owned(),
            phone: "819012345678".to_owned(),
            email: String::new(),
            status: "confirmed".to_owned(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["customerName"], "Tanaka");
        assert_eq!(value["experienceDate"], "2025-07-01");
        assert_eq!(value["timeSlot"], "10:30-11:30");
        assert_eq!(value["programName"], "Trial Yoga");
    }
}
