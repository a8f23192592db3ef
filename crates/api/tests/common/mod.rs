#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use axum_test::TestServer;
use chrono::{NaiveDate, NaiveDateTime, Utc, Weekday};
use detailbook_api::{ApiState, app, services::booking::BookingService};
use detailbook_core::{
    errors::ShopError,
    models::{
        catalog::{AddOn, Formula, ServiceCatalogItem, SizeVariation, VehicleSize},
        reservation::ExistingReservation,
        schedule::{BookingRules, DaySchedule, TimeOfDay, Timeframe, WeeklySchedule},
        shop::Shop,
    },
};
use detailbook_db::mock::repositories::MockShopStore;
use rust_decimal_macros::dec;
use uuid::Uuid;

pub const DEFAULT_GRANULARITY: u32 = 30;

pub struct TestContext {
    pub shop_id: Uuid,
    pub store: MockShopStore,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            shop_id: Uuid::new_v4(),
            store: MockShopStore::new(),
        }
    }

    pub fn with_shop(mut self, timezone: &str) -> Self {
        let shop = Shop {
            id: self.shop_id,
            name: "Bubble Bay Detailing".to_string(),
            timezone: timezone.to_string(),
            created_at: Utc::now(),
        };
        self.store
            .expect_get_shop()
            .returning(move |_| Ok(shop.clone()));
        self
    }

    pub fn with_unknown_shop(mut self) -> Self {
        self.store.expect_get_shop().returning(|shop_id| {
            Err(ShopError::NotFound(format!(
                "Shop with ID {} not found",
                shop_id
            )))
        });
        self
    }

    pub fn with_catalog(mut self) -> Self {
        self.store
            .expect_get_services()
            .returning(|_| Ok(catalog()));
        self.store
            .expect_get_vehicle_sizes()
            .returning(|_| Ok(vehicle_sizes()));
        self
    }

    pub fn with_schedule(mut self, schedule: WeeklySchedule, rules: BookingRules) -> Self {
        self.store
            .expect_get_opening_hours()
            .returning(move |_| Ok(schedule.clone()));
        self.store
            .expect_get_booking_rules()
            .returning(move |_| Ok(rules));
        self
    }

    pub fn with_reservations(mut self, reservations: Vec<ExistingReservation>) -> Self {
        self.store
            .expect_get_reservations()
            .returning(move |_, _, _| Ok(reservations.clone()));
        self
    }

    pub fn into_service(self) -> BookingService {
        BookingService::new(Arc::new(self.store), DEFAULT_GRANULARITY)
    }

    pub fn into_server(self) -> TestServer {
        let state = Arc::new(ApiState::new(Arc::new(self.store), DEFAULT_GRANULARITY));
        TestServer::new(app(state)).unwrap()
    }
}

pub fn vehicle_sizes() -> Vec<VehicleSize> {
    vec![
        VehicleSize {
            id: "small".to_string(),
            name: "Small".to_string(),
        },
        VehicleSize {
            id: "medium".to_string(),
            name: "Medium".to_string(),
        },
    ]
}

/// One service: full wash at 50 / 60 min.
pub fn catalog() -> Vec<ServiceCatalogItem> {
    vec![ServiceCatalogItem {
        id: "full-wash".to_string(),
        name: "Full wash".to_string(),
        base_price: dec!(50),
        base_duration_minutes: 60,
        vehicle_size_variations: BTreeMap::from([(
            "medium".to_string(),
            SizeVariation {
                price: dec!(10),
                duration_minutes: 10,
            },
        )]),
        formulas: vec![Formula {
            id: "premium".to_string(),
            name: "Premium".to_string(),
            additional_price: dec!(40),
            additional_duration_minutes: 30,
        }],
        add_ons: vec![AddOn {
            id: "pet-hair".to_string(),
            name: "Pet hair removal".to_string(),
            price: dec!(15),
            duration_minutes: 20,
        }],
    }]
}

pub fn time(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::from_hm(hour, minute).unwrap()
}

/// Open Mondays 09:00-12:00, closed otherwise.
pub fn monday_morning() -> WeeklySchedule {
    WeeklySchedule::closed().with_day(
        Weekday::Mon,
        DaySchedule::open(vec![Timeframe::new(time(9, 0), time(12, 0))]),
    )
}

pub fn always_open() -> WeeklySchedule {
    let mut schedule = WeeklySchedule::closed();
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        schedule.set_day(
            weekday,
            DaySchedule::open(vec![Timeframe::new(
                TimeOfDay::MIDNIGHT,
                TimeOfDay::END_OF_DAY,
            )]),
        );
    }
    schedule
}

pub fn rules(min_notice_minutes: u32, max_horizon_days: u32) -> BookingRules {
    BookingRules {
        min_notice_minutes,
        max_horizon_days,
    }
}

/// 2024-01-01 is a Monday.
pub fn jan(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
