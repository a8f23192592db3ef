pub mod catalog;
pub mod quote;
pub mod reservation;
pub mod schedule;
pub mod shop;
