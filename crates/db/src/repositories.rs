pub mod catalog;
pub mod reservation;
pub mod schedule;
