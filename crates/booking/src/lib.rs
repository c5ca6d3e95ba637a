use service::auth::AuthService;
use service::calendar::Calendar;
use service::customers::Customers;
use service::instructors::Instructors;
use service::programs::Programs;
use service::reservations::Reservations;
use service::studios::Studios;
use storage::session::Db;
use storage::Storage;

pub mod service;

#[derive(Clone)]
pub struct Booking {
    pub db: Db,
    pub calendar: Calendar,
    pub reservations: Reservations,
    pub programs: Programs,
    pub instructors: Instructors,
    pub studios: Studios,
    pub customers: Customers,
    pub auth: AuthService,
}

impl Booking {
    pub fn new(storage: Storage, staff_access_key: String) -> Self {
        let programs = Programs::new(storage.programs, storage.schedules.clone());
        let instructors = Instructors::new(storage.instructors, storage.schedules.clone());
        let studios = Studios::new(storage.studios, storage.schedules.clone());
        let customers = Customers::new(storage.customers);
        let calendar = Calendar::new(
            storage.schedules.clone(),
            storage.reservations.clone(),
            programs.clone(),
            instructors.clone(),
            studios.clone(),
        );
        let reservations = Reservations::new(
            storage.reservations,
            storage.schedules,
            customers.clone(),
        );
        let auth = AuthService::new(storage.auth_keys, staff_access_key);
        Booking {
            db: storage.db,
            calendar,
            reservations,
            programs,
            instructors,
            studios,
            customers,
            auth,
        }
    }
}
