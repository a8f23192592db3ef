use chrono::{DateTime, NaiveDateTime, Utc};
use detailbook_core::models::{
    catalog::{AddOn, Formula, SizeVariation, VehicleSize},
    quote::QuoteLine,
    reservation::ExistingReservation,
    schedule::{BookingRules, DaySchedule, Timeframe},
    shop::Shop,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

/// Negative values are rejected by CHECK constraints; clamp anyway.
fn minutes(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShop {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbShop> for Shop {
    fn from(row: DbShop) -> Self {
        Self {
            id: row.id,
            name: row.name,
            timezone: row.timezone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVehicleSize {
    pub id: String,
    pub name: String,
}

impl From<DbVehicleSize> for VehicleSize {
    fn from(row: DbVehicleSize) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: String,
    pub name: String,
    pub base_price: Decimal,
    pub base_duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSizeVariation {
    pub service_id: String,
    pub vehicle_size_id: String,
    pub price: Decimal,
    pub duration_minutes: i32,
}

impl From<&DbSizeVariation> for SizeVariation {
    fn from(row: &DbSizeVariation) -> Self {
        Self {
            price: row.price,
            duration_minutes: minutes(row.duration_minutes),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFormula {
    pub service_id: String,
    pub id: String,
    pub name: String,
    pub additional_price: Decimal,
    pub additional_duration_minutes: i32,
}

impl From<DbFormula> for Formula {
    fn from(row: DbFormula) -> Self {
        Self {
            id: row.id,
            name: row.name,
            additional_price: row.additional_price,
            additional_duration_minutes: minutes(row.additional_duration_minutes),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAddOn {
    pub service_id: String,
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: i32,
}

impl From<DbAddOn> for AddOn {
    fn from(row: DbAddOn) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            duration_minutes: minutes(row.duration_minutes),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOpeningHours {
    pub weekday: i16,
    pub is_open: bool,
    pub timeframes: Json<Vec<Timeframe>>,
}

impl From<DbOpeningHours> for DaySchedule {
    fn from(row: DbOpeningHours) -> Self {
        Self {
            is_open: row.is_open,
            timeframes: row.timeframes.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingRules {
    pub min_notice_minutes: i32,
    pub max_horizon_days: i32,
}

impl From<DbBookingRules> for BookingRules {
    fn from(row: DbBookingRules) -> Self {
        Self {
            min_notice_minutes: minutes(row.min_notice_minutes),
            max_horizon_days: minutes(row.max_horizon_days),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub duration_minutes: i32,
    pub total_price: Decimal,
    pub services: Json<Vec<QuoteLine>>,
    pub created_at: DateTime<Utc>,
}

impl From<&DbReservation> for ExistingReservation {
    fn from(row: &DbReservation) -> Self {
        Self::new(
            row.starts_at.date(),
            row.starts_at.time(),
            minutes(row.duration_minutes),
        )
    }
}
