pub mod availability;
pub mod quote;
pub mod reservation;
