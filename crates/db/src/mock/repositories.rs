use async_trait::async_trait;
use chrono::NaiveDate;
use detailbook_core::{
    errors::ShopResult,
    models::{
        catalog::{ServiceCatalogItem, VehicleSize},
        reservation::{ExistingReservation, ReservationRequest},
        schedule::{BookingRules, WeeklySchedule},
        shop::Shop,
    },
    ports::{CatalogReader, ReservationReader, ReservationWriter, ScheduleReader},
};
use mockall::mock;
use uuid::Uuid;

// Mock store for testing the booking flow without a database
mock! {
    pub ShopStore {}

    #[async_trait]
    impl CatalogReader for ShopStore {
        async fn get_services(&self, shop_id: Uuid) -> ShopResult<Vec<ServiceCatalogItem>>;

        async fn get_vehicle_sizes(&self, shop_id: Uuid) -> ShopResult<Vec<VehicleSize>>;
    }

    #[async_trait]
    impl ScheduleReader for ShopStore {
        async fn get_shop(&self, shop_id: Uuid) -> ShopResult<Shop>;

        async fn get_opening_hours(&self, shop_id: Uuid) -> ShopResult<WeeklySchedule>;

        async fn get_booking_rules(&self, shop_id: Uuid) -> ShopResult<BookingRules>;
    }

    #[async_trait]
    impl ReservationReader for ShopStore {
        async fn get_reservations(
            &self,
            shop_id: Uuid,
            from: NaiveDate,
            to: NaiveDate,
        ) -> ShopResult<Vec<ExistingReservation>>;
    }

    #[async_trait]
    impl ReservationWriter for ShopStore {
        async fn create_reservation(&self, request: &ReservationRequest) -> ShopResult<Uuid>;
    }
}
