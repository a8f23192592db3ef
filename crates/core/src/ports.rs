//! Data-access traits the booking flow depends on.
//!
//! The storage crate implements them over PostgreSQL; tests use mocks. Slot
//! lists computed from [`ReservationReader`] data are advisory only: the
//! writer is the one place where overlapping reservations are rejected.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::ShopResult,
    models::{
        catalog::{ServiceCatalogItem, VehicleSize},
        reservation::{ExistingReservation, ReservationRequest},
        schedule::{BookingRules, WeeklySchedule},
        shop::Shop,
    },
};

#[async_trait]
pub trait CatalogReader {
    async fn get_services(&self, shop_id: Uuid) -> ShopResult<Vec<ServiceCatalogItem>>;

    async fn get_vehicle_sizes(&self, shop_id: Uuid) -> ShopResult<Vec<VehicleSize>>;
}

#[async_trait]
pub trait ScheduleReader {
    /// Fails with `ShopError::NotFound` for an unknown shop.
    async fn get_shop(&self, shop_id: Uuid) -> ShopResult<Shop>;

    async fn get_opening_hours(&self, shop_id: Uuid) -> ShopResult<WeeklySchedule>;

    async fn get_booking_rules(&self, shop_id: Uuid) -> ShopResult<BookingRules>;
}

#[async_trait]
pub trait ReservationReader {
    /// Reservations starting on any day in `from..=to`.
    async fn get_reservations(
        &self,
        shop_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ShopResult<Vec<ExistingReservation>>;
}

#[async_trait]
pub trait ReservationWriter {
    /// Persists the reservation with its frozen quote.
    ///
    /// Fails with `ShopError::Conflict` when an overlapping reservation was
    /// committed in the meantime.
    async fn create_reservation(&self, request: &ReservationRequest) -> ShopResult<Uuid>;
}

/// Everything the booking flow needs from storage.
pub trait ShopStore:
    CatalogReader + ScheduleReader + ReservationReader + ReservationWriter + Send + Sync
{
}

impl<T> ShopStore for T where
    T: CatalogReader + ScheduleReader + ReservationReader + ReservationWriter + Send + Sync
{
}
