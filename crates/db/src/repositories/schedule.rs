use chrono::Weekday;
use detailbook_core::models::schedule::{BookingRules, DaySchedule, WeeklySchedule};
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbBookingRules, DbOpeningHours, DbShop};

pub async fn get_shop_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbShop>> {
    let shop = sqlx::query_as::<_, DbShop>(
        r#"
        SELECT id, name, timezone, created_at
        FROM shops
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(shop)
}

/// Days without a row are treated as closed.
pub async fn get_opening_hours(pool: &Pool<Postgres>, shop_id: Uuid) -> Result<WeeklySchedule> {
    let rows = sqlx::query_as::<_, DbOpeningHours>(
        r#"
        SELECT weekday, is_open, timeframes
        FROM opening_hours
        WHERE shop_id = $1
        ORDER BY weekday ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    build_weekly_schedule(rows)
}

pub fn build_weekly_schedule(rows: Vec<DbOpeningHours>) -> Result<WeeklySchedule> {
    let mut schedule = WeeklySchedule::closed();
    for row in rows {
        let weekday = u8::try_from(row.weekday)
            .ok()
            .and_then(|day| Weekday::try_from(day).ok())
            .ok_or_else(|| eyre!("Invalid weekday {} in opening hours", row.weekday))?;
        schedule.set_day(weekday, DaySchedule::from(row));
    }
    Ok(schedule)
}

pub async fn get_booking_rules(
    pool: &Pool<Postgres>,
    shop_id: Uuid,
) -> Result<Option<BookingRules>> {
    let rules = sqlx::query_as::<_, DbBookingRules>(
        r#"
        SELECT min_notice_minutes, max_horizon_days
        FROM booking_rules
        WHERE shop_id = $1
        "#,
    )
    .bind(shop_id)
    .fetch_optional(pool)
    .await?;

    Ok(rules.map(BookingRules::from))
}
