pub mod auth;
pub mod customer;
pub mod ids;
pub mod instructor;
pub mod program;
pub mod recurrence;
pub mod reservation;
pub mod schedule;
pub mod session;
pub mod slot;
pub mod studio;
