//! PostgreSQL implementation of the booking data-access traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use detailbook_core::{
    errors::{ShopError, ShopResult},
    models::{
        catalog::{ServiceCatalogItem, VehicleSize},
        reservation::{ExistingReservation, ReservationRequest},
        schedule::{BookingRules, WeeklySchedule},
        shop::Shop,
    },
    ports::{CatalogReader, ReservationReader, ReservationWriter, ScheduleReader},
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{catalog, reservation, schedule},
};

#[derive(Clone)]
pub struct PgShopStore {
    pool: DbPool,
}

impl PgShopStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogReader for PgShopStore {
    async fn get_services(&self, shop_id: Uuid) -> ShopResult<Vec<ServiceCatalogItem>> {
        Ok(catalog::get_services(&self.pool, shop_id).await?)
    }

    async fn get_vehicle_sizes(&self, shop_id: Uuid) -> ShopResult<Vec<VehicleSize>> {
        Ok(catalog::get_vehicle_sizes(&self.pool, shop_id).await?)
    }
}

#[async_trait]
impl ScheduleReader for PgShopStore {
    async fn get_shop(&self, shop_id: Uuid) -> ShopResult<Shop> {
        schedule::get_shop_by_id(&self.pool, shop_id)
            .await?
            .map(Shop::from)
            .ok_or_else(|| ShopError::NotFound(format!("Shop with ID {} not found", shop_id)))
    }

    async fn get_opening_hours(&self, shop_id: Uuid) -> ShopResult<WeeklySchedule> {
        Ok(schedule::get_opening_hours(&self.pool, shop_id).await?)
    }

    async fn get_booking_rules(&self, shop_id: Uuid) -> ShopResult<BookingRules> {
        let rules = schedule::get_booking_rules(&self.pool, shop_id).await?;
        Ok(rules.unwrap_or_else(|| {
            tracing::debug!("No booking rules for shop {}, using defaults", shop_id);
            BookingRules::default()
        }))
    }
}

#[async_trait]
impl ReservationReader for PgShopStore {
    async fn get_reservations(
        &self,
        shop_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ShopResult<Vec<ExistingReservation>> {
        let rows =
            reservation::get_reservations_by_date_range(&self.pool, shop_id, from, to).await?;
        Ok(rows.iter().map(ExistingReservation::from).collect())
    }
}

#[async_trait]
impl ReservationWriter for PgShopStore {
    async fn create_reservation(&self, request: &ReservationRequest) -> ShopResult<Uuid> {
        match reservation::create_reservation(&self.pool, request).await {
            Ok(row) => Ok(row.id),
            Err(err) if reservation::is_overlap_violation(&err) => {
                tracing::warn!(
                    "Reservation for shop {} at {} lost a race to a concurrent booking",
                    request.shop_id,
                    request.slot_start
                );
                Err(ShopError::Conflict(
                    "slot no longer available, please pick another".to_string(),
                ))
            }
            Err(err) => Err(ShopError::Database(err)),
        }
    }
}
