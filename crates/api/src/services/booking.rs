//! # Booking Service
//!
//! Orchestrates the booking flow on top of the store traits:
//!
//! 1. `quote` prices the current cart
//! 2. `available_slots` lists start times for the quoted duration
//! 3. `confirm` re-prices the cart, re-checks the chosen slot against fresh
//!    reservations, and hands the frozen quote to the reservation writer
//!
//! The re-check in step 3 only narrows the race window between two customers;
//! the store's overlap constraint is what finally rejects a double booking.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use detailbook_core::{
    compute_bookable_slots, compute_quote,
    errors::{ShopError, ShopResult},
    is_slot_bookable,
    models::{
        catalog::CartLine,
        quote::BookingQuote,
        reservation::{CreateReservationRequest, CreateReservationResponse, ReservationRequest},
        schedule::{AvailabilityResponse, BookingRules},
        shop::Shop,
    },
    ports::{CatalogReader, ReservationReader, ReservationWriter, ScheduleReader, ShopStore},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Longest horizon, in days, the service expands into concrete slots.
///
/// Longer stored horizons are clamped for both listing and confirmation.
pub const MAX_HORIZON_DAYS: u32 = 365;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn ShopStore>,
    slot_granularity_minutes: u32,
}

impl BookingService {
    pub fn new(store: Arc<dyn ShopStore>, slot_granularity_minutes: u32) -> Self {
        Self {
            store,
            slot_granularity_minutes,
        }
    }

    pub fn slot_granularity_minutes(&self) -> u32 {
        self.slot_granularity_minutes
    }

    /// Prices a cart against the shop's current catalog.
    pub async fn quote(&self, shop_id: Uuid, lines: &[CartLine]) -> ShopResult<BookingQuote> {
        self.store.get_shop(shop_id).await?;
        self.price(shop_id, lines).await
    }

    /// Lists bookable starts for `duration_minutes`, as of `now`.
    pub async fn available_slots(
        &self,
        shop_id: Uuid,
        duration_minutes: u32,
        granularity_minutes: Option<u32>,
        now: DateTime<Utc>,
    ) -> ShopResult<AvailabilityResponse> {
        let shop = self.store.get_shop(shop_id).await?;
        let now = shop_local_time(&shop, now)?;
        let granularity = granularity_minutes.unwrap_or(self.slot_granularity_minutes);

        let (schedule, rules) = tokio::try_join!(
            self.store.get_opening_hours(shop_id),
            self.store.get_booking_rules(shop_id),
        )?;
        let rules = clamp_horizon(shop_id, rules);

        let (lower, upper) = rules.window(now);
        // Start a day early: a reservation from the previous evening can run past midnight.
        let reservations = self
            .store
            .get_reservations(shop_id, (lower - Duration::days(1)).date(), upper.date())
            .await?;

        let slots: Vec<NaiveDateTime> = compute_bookable_slots(
            &schedule,
            &rules,
            duration_minutes,
            &reservations,
            granularity,
            now,
        )?
        .collect();

        Ok(AvailabilityResponse {
            duration_minutes,
            granularity_minutes: granularity,
            slots,
        })
    }

    /// Books `request.slot_start` for the given cart.
    ///
    /// # Errors
    ///
    /// * `ShopError::NotFound` - unknown shop
    /// * `ShopError::Validation` - nothing bookable in the cart, or a malformed line
    /// * `ShopError::Conflict` - the slot is no longer available
    pub async fn confirm(
        &self,
        shop_id: Uuid,
        request: CreateReservationRequest,
        now: DateTime<Utc>,
    ) -> ShopResult<CreateReservationResponse> {
        let shop = self.store.get_shop(shop_id).await?;
        let now = shop_local_time(&shop, now)?;

        let quote = self.price(shop_id, &request.lines).await?;
        if quote.is_empty() || quote.total_duration_minutes == 0 {
            return Err(ShopError::Validation(
                "cart does not contain any bookable service".to_string(),
            ));
        }

        let (schedule, rules) = tokio::try_join!(
            self.store.get_opening_hours(shop_id),
            self.store.get_booking_rules(shop_id),
        )?;
        let rules = clamp_horizon(shop_id, rules);
        let slot_day = request.slot_start.date();
        let reservations = self
            .store
            .get_reservations(shop_id, slot_day - Duration::days(1), slot_day)
            .await?;

        let bookable = is_slot_bookable(
            &schedule,
            &rules,
            quote.total_duration_minutes,
            &reservations,
            request
                .granularity_minutes
                .unwrap_or(self.slot_granularity_minutes),
            now,
            request.slot_start,
        )?;
        if !bookable {
            warn!(
                "Rejected reservation for shop {} at {}: slot not available",
                shop_id, request.slot_start
            );
            return Err(ShopError::Conflict(
                "slot no longer available, please pick another".to_string(),
            ));
        }

        let reservation = ReservationRequest {
            shop_id,
            slot_start: request.slot_start,
            quote,
        };
        let id = self.store.create_reservation(&reservation).await?;
        info!(
            "Created reservation {} for shop {} at {} ({} min, total {})",
            id,
            shop_id,
            reservation.slot_start,
            reservation.duration_minutes(),
            reservation.quote.total_price
        );

        Ok(CreateReservationResponse {
            id,
            slot_start: reservation.slot_start,
            quote: reservation.quote,
        })
    }

    async fn price(&self, shop_id: Uuid, lines: &[CartLine]) -> ShopResult<BookingQuote> {
        let (services, vehicle_sizes) = tokio::try_join!(
            self.store.get_services(shop_id),
            self.store.get_vehicle_sizes(shop_id),
        )?;
        compute_quote(lines, &services, &vehicle_sizes)
    }
}

fn clamp_horizon(shop_id: Uuid, rules: BookingRules) -> BookingRules {
    if rules.max_horizon_days <= MAX_HORIZON_DAYS {
        return rules;
    }
    debug!(
        "Shop {} horizon of {} days clamped to {}",
        shop_id, rules.max_horizon_days, MAX_HORIZON_DAYS
    );
    BookingRules {
        max_horizon_days: MAX_HORIZON_DAYS,
        ..rules
    }
}

/// Wall-clock time at the shop for a UTC instant.
pub fn shop_local_time(shop: &Shop, now: DateTime<Utc>) -> ShopResult<NaiveDateTime> {
    let tz: Tz = shop.timezone.parse().map_err(|_| {
        ShopError::Validation(format!(
            "shop {} has an unknown timezone: {}",
            shop.id, shop.timezone
        ))
    })?;
    Ok(now.with_timezone(&tz).naive_local())
}
