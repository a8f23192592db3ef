use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    catalog::CartLine,
    quote::{BookingQuote, QuoteLine},
};

/// A committed booking, reduced to what slot computation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingReservation {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
}

impl ExistingReservation {
    pub fn new(date: NaiveDate, start_time: NaiveTime, duration_minutes: u32) -> Self {
        Self {
            date,
            start_time,
            duration_minutes,
        }
    }

    /// Occupied interval `[start, end)` in shop-local time.
    pub fn interval(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.date.and_time(self.start_time);
        (
            start,
            start + Duration::minutes(i64::from(self.duration_minutes)),
        )
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let (booked_start, booked_end) = self.interval();
        start < booked_end && booked_start < end
    }
}

/// What gets handed to the reservation writer once a slot is confirmed.
///
/// The quote is frozen at confirmation time; later catalog edits never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub shop_id: Uuid,
    pub slot_start: NaiveDateTime,
    pub quote: BookingQuote,
}

impl ReservationRequest {
    pub fn duration_minutes(&self) -> u32 {
        self.quote.total_duration_minutes
    }

    pub fn slot_end(&self) -> NaiveDateTime {
        self.slot_start + Duration::minutes(i64::from(self.duration_minutes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub total_price: Decimal,
    pub services: Vec<QuoteLine>,
    pub created_at: DateTime<Utc>,
}

impl From<&Reservation> for ExistingReservation {
    fn from(reservation: &Reservation) -> Self {
        Self::new(
            reservation.date,
            reservation.start_time,
            reservation.duration_minutes,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub slot_start: NaiveDateTime,
    pub lines: Vec<CartLine>,
    /// Must match the granularity the slot was listed with, if it was not the default.
    #[serde(default)]
    pub granularity_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationResponse {
    pub id: Uuid,
    pub slot_start: NaiveDateTime,
    pub quote: BookingQuote,
}
