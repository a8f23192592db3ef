//! # Detailbook Core
//!
//! Pure domain logic for the detailing-shop booking flow: the models shared by
//! every layer, the quote aggregator, the availability engine and the traits
//! the storage layer implements.
//!
//! Nothing in this crate performs I/O. Callers resolve catalog, schedule and
//! reservation data first and pass it in, including the current local time.

pub mod availability;
pub mod errors;
pub mod models;
pub mod ports;
pub mod pricing;

pub use availability::{BookableSlots, compute_bookable_slots, is_slot_bookable};
pub use errors::{ShopError, ShopResult};
pub use pricing::compute_quote;
