//! # Availability Engine
//!
//! Expands a shop's weekly opening hours into concrete slot start times.
//!
//! ## Slot rules
//!
//! 1. The admissible window is `[now + min_notice, now + max_horizon_days]`,
//!    both ends inclusive.
//! 2. Every calendar day touched by the window is visited in order. Closed
//!    days and days without valid timeframes produce nothing.
//! 3. Inside a timeframe, candidates start at its `from` and advance by the
//!    slot granularity for as long as the whole slot still ends by `to`.
//!    Candidates are anchored to their own timeframe, not to the clock.
//! 4. A candidate is kept when its start lies inside the window and its
//!    half-open interval does not overlap any existing reservation.
//!
//! Only the *start* of a slot is checked against the horizon; a slot that
//! starts at the very end of the window is bookable even though it finishes
//! after it.
//!
//! Timeframes with `to <= from` are skipped so that half-migrated shop data
//! degrades to fewer slots instead of an error.

use std::{collections::VecDeque, iter::FusedIterator};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{
    errors::{ShopError, ShopResult},
    models::{
        reservation::ExistingReservation,
        schedule::{BookingRules, MINUTES_PER_DAY, TimeOfDay, Timeframe, WeeklySchedule},
    },
};

/// Lazily computed, chronologically ordered slot starts.
///
/// Days are expanded one at a time as the iterator advances. Cloning an
/// untouched iterator gives an independent copy that replays the same slots.
#[derive(Debug, Clone)]
pub struct BookableSlots<'a> {
    schedule: &'a WeeklySchedule,
    reservations: &'a [ExistingReservation],
    duration_minutes: u32,
    granularity_minutes: u32,
    lower: NaiveDateTime,
    upper: NaiveDateTime,
    next_day: Option<NaiveDate>,
    pending: VecDeque<NaiveDateTime>,
}

/// Computes the bookable slot starts for a booking of `duration_minutes`.
///
/// `now` is the current wall-clock time in the shop's timezone. Reservations
/// are compared as local intervals, so one that runs past midnight still
/// blocks the early slots of the following day.
///
/// # Errors
///
/// * `ShopError::Validation` - zero duration, zero granularity or a booking
///   horizon shorter than one day
pub fn compute_bookable_slots<'a>(
    schedule: &'a WeeklySchedule,
    rules: &BookingRules,
    duration_minutes: u32,
    existing_reservations: &'a [ExistingReservation],
    slot_granularity_minutes: u32,
    now: NaiveDateTime,
) -> ShopResult<BookableSlots<'a>> {
    validate_request(rules, duration_minutes, slot_granularity_minutes)?;

    let (lower, upper) = rules.window(now);
    Ok(BookableSlots {
        schedule,
        reservations: existing_reservations,
        duration_minutes,
        granularity_minutes: slot_granularity_minutes,
        lower,
        upper,
        next_day: Some(lower.date()),
        pending: VecDeque::new(),
    })
}

/// Re-checks a single proposed slot start against fresh data.
///
/// Returns `true` exactly when [`compute_bookable_slots`] would yield
/// `slot_start` for the same inputs.
pub fn is_slot_bookable(
    schedule: &WeeklySchedule,
    rules: &BookingRules,
    duration_minutes: u32,
    existing_reservations: &[ExistingReservation],
    slot_granularity_minutes: u32,
    now: NaiveDateTime,
    slot_start: NaiveDateTime,
) -> ShopResult<bool> {
    validate_request(rules, duration_minutes, slot_granularity_minutes)?;

    let (lower, upper) = rules.window(now);
    if slot_start < lower || slot_start > upper {
        return Ok(false);
    }
    if slot_start.second() != 0 || slot_start.nanosecond() != 0 {
        return Ok(false);
    }

    let minute = TimeOfDay::of(slot_start.time()).minutes();
    let aligned = schedule
        .day(slot_start.weekday())
        .bookable_timeframes()
        .iter()
        .any(|frame| {
            minute >= frame.from.minutes()
                && minute
                    .checked_add(duration_minutes)
                    .is_some_and(|end| end <= frame.to.minutes())
                && (minute - frame.from.minutes()) % slot_granularity_minutes == 0
        });
    if !aligned {
        return Ok(false);
    }

    let slot_end = after(slot_start, duration_minutes);
    Ok(!existing_reservations
        .iter()
        .any(|reservation| reservation.overlaps(slot_start, slot_end)))
}

fn validate_request(
    rules: &BookingRules,
    duration_minutes: u32,
    slot_granularity_minutes: u32,
) -> ShopResult<()> {
    if duration_minutes == 0 {
        return Err(ShopError::Validation(
            "slot duration must be positive".to_string(),
        ));
    }
    if slot_granularity_minutes == 0 {
        return Err(ShopError::Validation(
            "slot granularity must be positive".to_string(),
        ));
    }
    if rules.max_horizon_days == 0 {
        return Err(ShopError::Validation(
            "booking horizon must be at least one day".to_string(),
        ));
    }
    Ok(())
}

fn minutes(count: u32) -> Duration {
    Duration::minutes(i64::from(count))
}

/// `start + count` minutes, saturating at the end of the calendar.
fn after(start: NaiveDateTime, count: u32) -> NaiveDateTime {
    start
        .checked_add_signed(minutes(count))
        .unwrap_or(NaiveDateTime::MAX)
}

impl BookableSlots<'_> {
    /// Inclusive bounds every yielded start lies within.
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.lower, self.upper)
    }

    fn expand_day(&self, day: NaiveDate) -> Vec<NaiveDateTime> {
        let frames = self.schedule.day(day.weekday()).bookable_timeframes();
        if frames.is_empty() {
            return Vec::new();
        }

        let midnight = day.and_time(NaiveTime::MIN);
        let day_end = after(after(midnight, MINUTES_PER_DAY), self.duration_minutes);
        let blocking: Vec<_> = self
            .reservations
            .iter()
            .filter(|reservation| reservation.overlaps(midnight, day_end))
            .collect();

        let mut slots = Vec::new();
        for frame in frames {
            for start in self.frame_candidates(midnight, frame) {
                let end = after(start, self.duration_minutes);
                if blocking
                    .iter()
                    .all(|reservation| !reservation.overlaps(start, end))
                {
                    slots.push(start);
                }
            }
        }

        // Timeframes are sorted; this only matters if stored ones overlap.
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    /// Candidate starts of one timeframe that fall inside the window.
    fn frame_candidates(
        &self,
        midnight: NaiveDateTime,
        frame: Timeframe,
    ) -> impl Iterator<Item = NaiveDateTime> {
        let granularity = self.granularity_minutes;
        let upper = self.upper;
        let from = frame.from.minutes();
        let last_start = frame.to.minutes().checked_sub(self.duration_minutes);

        let frame_start = after(midnight, from);
        let first_step = if self.lower > frame_start {
            // Round up to the first anchored step at or after the lower bound.
            let behind = (self.lower - frame_start).num_seconds();
            let step = i64::from(granularity) * 60;
            u32::try_from((behind + step - 1) / step).unwrap_or(u32::MAX)
        } else {
            0
        };
        let first = first_step
            .checked_mul(granularity)
            .and_then(|offset| from.checked_add(offset));

        let (first, last) = match (first, last_start) {
            (Some(first), Some(last)) if first <= last => (first, last),
            _ => (1, 0),
        };

        (first..=last)
            .step_by(granularity as usize)
            .map(move |minute| after(midnight, minute))
            .take_while(move |start| *start <= upper)
    }
}

impl Iterator for BookableSlots<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.pending.pop_front() {
                return Some(slot);
            }

            let day = self.next_day?;
            self.next_day = day
                .succ_opt()
                .filter(|next| *next <= self.upper.date());
            let slots = self.expand_day(day);
            self.pending.extend(slots);
        }
    }
}

impl FusedIterator for BookableSlots<'_> {}
