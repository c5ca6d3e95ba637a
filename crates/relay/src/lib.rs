pub mod export;
pub mod line;
pub mod notify;
pub mod sheets;
