pub mod auth_key;
pub mod customer;
pub mod instructor;
pub mod program;
pub mod reservation;
pub mod schedule;
pub mod session;
pub mod studio;

use eyre::Result;
use session::Db;

const DB_NAME: &str = "studio_db";

#[derive(Clone)]
pub struct Storage {
    pub db: Db,
    pub schedules: schedule::ScheduleStore,
    pub reservations: reservation::ReservationStore,
    pub programs: program::ProgramStore,
    pub instructors: instructor::InstructorStore,
    pub studios: studio::StudioStore,
    pub customers: customer::CustomerStore,
    pub auth_keys: auth_key::AuthKeys,
}

impl Storage {
    pub async fn new(uri: &str) -> Result<Self> {
        let db = Db::new(uri, DB_NAME).await?;
        let schedules = schedule::ScheduleStore::new(&db).await?;
        let reservations = reservation::ReservationStore::new(&db).await?;
        let programs = program::ProgramStore::new(&db);
        let instructors = instructor::InstructorStore::new(&db);
        let studios = studio::StudioStore::new(&db);
        let customers = customer::CustomerStore::new(&db).await?;
        let auth_keys = auth_key::AuthKeys::new(&db).await?;

        Ok(Storage {
            db,
            schedules,
            reservations,
            programs,
            instructors,
            studios,
            customers,
            auth_keys,
        })
    }
}
