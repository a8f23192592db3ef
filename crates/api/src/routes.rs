pub mod availability;
pub mod health;
pub mod quote;
pub mod reservation;
