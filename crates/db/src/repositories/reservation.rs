use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use detailbook_core::models::reservation::ReservationRequest;
use eyre::Result;
use sqlx::{Pool, Postgres, types::Json};
use uuid::Uuid;

use crate::models::DbReservation;

/// Reservations of a shop starting on any day in `from..=to`.
pub async fn get_reservations_by_date_range(
    pool: &Pool<Postgres>,
    shop_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbReservation>> {
    let range_start = from.and_time(NaiveTime::MIN);
    let range_end = to.and_time(NaiveTime::MIN) + Duration::days(1);

    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, shop_id, starts_at, duration_minutes, total_price, services, created_at
        FROM reservations
        WHERE shop_id = $1 AND starts_at >= $2 AND starts_at < $3
        ORDER BY starts_at ASC
        "#,
    )
    .bind(shop_id)
    .bind(range_start)
    .bind(range_end)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Inserts a reservation with its frozen quote.
///
/// Overlaps are rejected by the `reservations_no_overlap` exclusion
/// constraint; callers can detect that with [`is_overlap_violation`].
pub async fn create_reservation(
    pool: &Pool<Postgres>,
    request: &ReservationRequest,
) -> Result<DbReservation> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let duration_minutes = i32::try_from(request.duration_minutes())?;

    tracing::debug!(
        "Creating reservation: id={}, shop_id={}, starts_at={}, duration={}",
        id,
        request.shop_id,
        request.slot_start,
        duration_minutes
    );

    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations (id, shop_id, starts_at, ends_at, duration_minutes, total_price, services, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, shop_id, starts_at, duration_minutes, total_price, services, created_at
        "#,
    )
    .bind(id)
    .bind(request.shop_id)
    .bind(request.slot_start)
    .bind(request.slot_end())
    .bind(duration_minutes)
    .bind(request.quote.total_price)
    .bind(Json(request.quote.breakdown.clone()))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(reservation)
}

/// Postgres `exclusion_violation`.
const EXCLUSION_VIOLATION: &str = "23P01";

pub fn is_overlap_violation(err: &eyre::Report) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => {
            db_err.code().as_deref() == Some(EXCLUSION_VIOLATION)
        }
        _ => false,
    }
}
