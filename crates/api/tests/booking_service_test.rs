mod common;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use detailbook_api::services::booking::{MAX_HORIZON_DAYS, shop_local_time};
use detailbook_core::{
    errors::ShopError,
    models::{
        catalog::CartLine,
        reservation::{CreateReservationRequest, ExistingReservation, ReservationRequest},
        shop::Shop,
    },
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{TestContext, jan, monday_morning, rules};

fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&jan(day, hour, minute))
}

fn booking(slot_start: chrono::NaiveDateTime, lines: Vec<CartLine>) -> CreateReservationRequest {
    CreateReservationRequest {
        slot_start,
        lines,
        granularity_minutes: None,
    }
}

#[tokio::test]
async fn test_quote_skips_services_the_shop_no_longer_offers() {
    let context = TestContext::new().with_shop("UTC").with_catalog();
    let shop_id = context.shop_id;
    let service = context.into_service();

    let quote = service
        .quote(
            shop_id,
            &[
                CartLine::new("full-wash").with_formula("premium"),
                CartLine::new("ceramic-coating"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(quote.breakdown.len(), 1);
    assert_eq!(quote.total_price, dec!(90));
    assert_eq!(quote.total_duration_minutes, 90);
}

#[tokio::test]
async fn test_available_slots_on_monday_morning() {
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_schedule(monday_morning(), rules(60, 7));
    let shop_id = context.shop_id;
    // The fetch starts a day before the window to catch overnight bookings.
    context
        .store
        .expect_get_reservations()
        .with(
            eq(shop_id),
            eq(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            eq(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),
        )
        .times(1)
        .returning(|_, _, _| Ok(vec![]));
    let service = context.into_service();

    let availability = service
        .available_slots(shop_id, 60, None, utc(1, 8, 0))
        .await
        .unwrap();

    assert_eq!(availability.granularity_minutes, 30);
    assert_eq!(
        availability.slots,
        vec![
            jan(1, 9, 0),
            jan(1, 9, 30),
            jan(1, 10, 0),
            jan(1, 10, 30),
            jan(1, 11, 0),
        ]
    );
}

#[tokio::test]
async fn test_available_slots_skip_existing_reservations() {
    let context = TestContext::new()
        .with_shop("UTC")
        .with_schedule(monday_morning(), rules(60, 7))
        .with_reservations(vec![ExistingReservation::new(
            jan(1, 0, 0).date(),
            jan(1, 10, 0).time(),
            60,
        )]);
    let shop_id = context.shop_id;
    let service = context.into_service();

    let availability = service
        .available_slots(shop_id, 60, None, utc(1, 8, 0))
        .await
        .unwrap();

    assert_eq!(availability.slots, vec![jan(1, 9, 0), jan(1, 11, 0)]);
}

#[tokio::test]
async fn test_available_slots_with_requested_granularity() {
    let context = TestContext::new()
        .with_shop("UTC")
        .with_schedule(monday_morning(), rules(60, 7))
        .with_reservations(vec![]);
    let shop_id = context.shop_id;
    let service = context.into_service();

    let availability = service
        .available_slots(shop_id, 60, Some(60), utc(1, 8, 0))
        .await
        .unwrap();

    assert_eq!(availability.granularity_minutes, 60);
    assert_eq!(
        availability.slots,
        vec![jan(1, 9, 0), jan(1, 10, 0), jan(1, 11, 0)]
    );
}

#[tokio::test]
async fn test_available_slots_use_shop_wall_clock() {
    // 08:00 UTC is 09:00 in Paris in winter; with one hour of notice the
    // first slot is 10:00 and the horizon ends next Monday at 09:00.
    let context = TestContext::new()
        .with_shop("Europe/Paris")
        .with_schedule(monday_morning(), rules(60, 7))
        .with_reservations(vec![]);
    let shop_id = context.shop_id;
    let service = context.into_service();

    let availability = service
        .available_slots(shop_id, 60, None, utc(1, 8, 0))
        .await
        .unwrap();

    assert_eq!(
        availability.slots,
        vec![jan(1, 10, 0), jan(1, 10, 30), jan(1, 11, 0), jan(8, 9, 0)]
    );
}

#[tokio::test]
async fn test_available_slots_for_unknown_shop() {
    let service = TestContext::new().with_unknown_shop().into_service();

    let result = service
        .available_slots(Uuid::new_v4(), 60, None, utc(1, 8, 0))
        .await;

    assert!(matches!(result, Err(ShopError::NotFound(_))));
}

#[tokio::test]
async fn test_available_slots_reject_unknown_timezone() {
    let context = TestContext::new().with_shop("Mars/Olympus_Mons");
    let shop_id = context.shop_id;
    let service = context.into_service();

    let result = service
        .available_slots(shop_id, 60, None, utc(1, 8, 0))
        .await;

    assert!(matches!(result, Err(ShopError::Validation(_))));
}

#[tokio::test]
async fn test_confirm_hands_frozen_quote_to_writer() {
    let reservation_id = Uuid::new_v4();
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_catalog()
        .with_schedule(monday_morning(), rules(60, 7))
        .with_reservations(vec![]);
    let shop_id = context.shop_id;
    context
        .store
        .expect_create_reservation()
        .withf(move |request: &ReservationRequest| {
            request.shop_id == shop_id
                && request.slot_start == jan(1, 10, 0)
                && request.quote.total_price == dec!(75)
                && request.slot_end() == jan(1, 11, 30)
        })
        .times(1)
        .returning(move |_| Ok(reservation_id));
    let service = context.into_service();

    let response = service
        .confirm(
            shop_id,
            booking(
                jan(1, 10, 0),
                vec![
                    CartLine::new("full-wash")
                        .with_vehicle_size("medium")
                        .with_add_on("pet-hair"),
                ],
            ),
            utc(1, 8, 0),
        )
        .await
        .unwrap();

    assert_eq!(response.id, reservation_id);
    assert_eq!(response.slot_start, jan(1, 10, 0));
    assert_eq!(response.quote.total_duration_minutes, 90);
}

#[tokio::test]
async fn test_confirm_rejects_empty_cart() {
    let mut context = TestContext::new().with_shop("UTC").with_catalog();
    context.store.expect_create_reservation().never();
    let shop_id = context.shop_id;
    let service = context.into_service();

    let result = service
        .confirm(
            shop_id,
            booking(jan(1, 10, 0), vec![CartLine::new("ceramic-coating")]),
            utc(1, 8, 0),
        )
        .await;

    assert!(matches!(result, Err(ShopError::Validation(_))));
}

#[rstest]
#[case::overlaps_existing(jan(1, 10, 0))]
#[case::before_notice(jan(1, 8, 30))]
#[case::off_the_grid(jan(1, 10, 15))]
#[case::runs_past_closing(jan(1, 11, 30))]
#[case::closed_day(jan(2, 10, 0))]
#[tokio::test]
async fn test_confirm_rejects_unavailable_slot(#[case] slot_start: chrono::NaiveDateTime) {
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_catalog()
        .with_schedule(monday_morning(), rules(30, 7))
        .with_reservations(vec![ExistingReservation::new(
            jan(1, 0, 0).date(),
            jan(1, 10, 30).time(),
            30,
        )]);
    context.store.expect_create_reservation().never();
    let shop_id = context.shop_id;
    let service = context.into_service();

    let result = service
        .confirm(
            shop_id,
            booking(slot_start, vec![CartLine::new("full-wash")]),
            utc(1, 8, 0),
        )
        .await;

    assert!(matches!(result, Err(ShopError::Conflict(_))));
}

#[tokio::test]
async fn test_confirm_uses_requested_granularity_for_recheck() {
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_catalog()
        .with_schedule(monday_morning(), rules(60, 7))
        .with_reservations(vec![]);
    context
        .store
        .expect_create_reservation()
        .times(1)
        .returning(|_| Ok(Uuid::new_v4()));
    let shop_id = context.shop_id;
    let service = context.into_service();

    let request = CreateReservationRequest {
        granularity_minutes: Some(15),
        ..booking(jan(1, 10, 15), vec![CartLine::new("full-wash")])
    };
    let response = service.confirm(shop_id, request, utc(1, 8, 0)).await;

    assert!(response.is_ok());
}

#[tokio::test]
async fn test_confirm_propagates_writer_conflict() {
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_catalog()
        .with_schedule(monday_morning(), rules(60, 7))
        .with_reservations(vec![]);
    context
        .store
        .expect_create_reservation()
        .times(1)
        .returning(|_| Err(ShopError::Conflict("overlapping reservation".to_string())));
    let shop_id = context.shop_id;
    let service = context.into_service();

    let result = service
        .confirm(
            shop_id,
            booking(jan(1, 9, 0), vec![CartLine::new("full-wash")]),
            utc(1, 8, 0),
        )
        .await;

    assert!(matches!(result, Err(ShopError::Conflict(_))));
}

#[rstest]
#[case::winter(utc(15, 12, 0), jan(15, 13, 0))]
#[case::utc_midnight(utc(1, 23, 30), jan(2, 0, 30))]
fn test_shop_local_time_in_paris(
    #[case] now: DateTime<Utc>,
    #[case] expected: chrono::NaiveDateTime,
) {
    let shop = Shop {
        id: Uuid::new_v4(),
        name: "Paris".to_string(),
        timezone: "Europe/Paris".to_string(),
        created_at: Utc::now(),
    };

    assert_eq!(shop_local_time(&shop, now).unwrap(), expected);
}

#[test]
fn test_shop_local_time_in_summer() {
    let shop = Shop {
        id: Uuid::new_v4(),
        name: "Paris".to_string(),
        timezone: "Europe/Paris".to_string(),
        created_at: Utc::now(),
    };
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();

    let local = shop_local_time(&shop, now).unwrap();

    assert_eq!(local.format("%H:%M").to_string(), "10:00");
}

#[tokio::test]
async fn test_available_slots_clamp_long_horizons() {
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_schedule(monday_morning(), rules(60, i32::MAX as u32));
    let shop_id = context.shop_id;
    // 2024 is a leap year: 365 days after Jan 1 is Dec 31.
    context
        .store
        .expect_get_reservations()
        .with(
            eq(shop_id),
            eq(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            eq(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
        )
        .times(1)
        .returning(|_, _, _| Ok(vec![]));
    let service = context.into_service();

    let availability = service
        .available_slots(shop_id, 60, None, utc(1, 8, 0))
        .await
        .unwrap();

    assert_eq!(MAX_HORIZON_DAYS, 365);
    assert_eq!(availability.slots.len(), 53 * 5);
    assert_eq!(
        availability.slots.last(),
        NaiveDate::from_ymd_opt(2024, 12, 30)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .as_ref()
    );
}

#[tokio::test]
async fn test_confirm_beyond_clamped_horizon_is_conflict() {
    let mut context = TestContext::new()
        .with_shop("UTC")
        .with_catalog()
        .with_schedule(monday_morning(), rules(60, i32::MAX as u32))
        .with_reservations(vec![]);
    context.store.expect_create_reservation().never();
    let shop_id = context.shop_id;
    let service = context.into_service();

    // First Monday of 2025, outside the 365-day listing horizon.
    let slot_start = NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let result = service
        .confirm(
            shop_id,
            booking(slot_start, vec![CartLine::new("full-wash")]),
            utc(1, 8, 0),
        )
        .await;

    assert!(matches!(result, Err(ShopError::Conflict(_))));
}
