//! # Quote Aggregation
//!
//! Turns a booking cart into a price and duration. Every cart line adds up to
//! four contributions, and each one is kept separately in the breakdown:
//!
//! 1. the service's base price and duration
//! 2. the surcharge for the selected vehicle size, if the service defines one
//! 3. the selected formula tier
//! 4. every selected add-on the service offers
//!
//! References that cannot be resolved are skipped, never reported as errors.
//! A cart may still point at a service or add-on that was deleted since it was
//! built. Only a structurally broken line (no service id at all) is rejected,
//! along with carts whose totals overflow the price or minute counters.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    errors::{ShopError, ShopResult},
    models::{
        catalog::{CartLine, ServiceCatalogItem, SizeVariation, VehicleSize},
        quote::{BookingQuote, QuoteLine},
    },
};

/// Computes the quote for a cart against the shop's catalog.
///
/// An empty cart yields [`BookingQuote::empty`]. Lines whose service is not in
/// `catalog` are left out of the breakdown. A vehicle size only adds a
/// surcharge when it is both a known size in `vehicle_sizes` and listed in the
/// service's variations.
///
/// # Errors
///
/// * `ShopError::Validation` - a line has a blank `service_id`, or the summed
///   price or duration overflows
pub fn compute_quote(
    lines: &[CartLine],
    catalog: &[ServiceCatalogItem],
    vehicle_sizes: &[VehicleSize],
) -> ShopResult<BookingQuote> {
    if let Some(position) = lines
        .iter()
        .position(|line| line.service_id.trim().is_empty())
    {
        return Err(ShopError::Validation(format!(
            "cart line {position} has no service id"
        )));
    }

    let mut quote = BookingQuote::empty();
    for line in lines {
        let Some(service) = catalog.iter().find(|item| item.id == line.service_id) else {
            debug!(service_id = %line.service_id, "skipping cart line for unknown service");
            continue;
        };

        let quote_line = price_line(line, service, vehicle_sizes)?;
        quote.total_price = quote_line
            .total_price()
            .and_then(|price| quote.total_price.checked_add(price))
            .ok_or_else(|| overflow("price"))?;
        quote.total_duration_minutes = quote_line
            .total_duration_minutes()
            .and_then(|minutes| quote.total_duration_minutes.checked_add(minutes))
            .ok_or_else(|| overflow("duration"))?;
        quote.breakdown.push(quote_line);
    }

    Ok(quote)
}

fn price_line(
    line: &CartLine,
    service: &ServiceCatalogItem,
    vehicle_sizes: &[VehicleSize],
) -> ShopResult<QuoteLine> {
    let size = line
        .vehicle_size_id
        .as_deref()
        .filter(|size_id| vehicle_sizes.iter().any(|size| size.id == *size_id));
    let size_variation = size
        .and_then(|size_id| service.size_variation(size_id))
        .copied()
        .unwrap_or_default();
    if size.is_none() && line.vehicle_size_id.is_some() {
        debug!(
            service_id = %service.id,
            vehicle_size_id = ?line.vehicle_size_id,
            "unknown vehicle size, no surcharge applied"
        );
    }

    let formula = line
        .formula_id
        .as_deref()
        .and_then(|formula_id| service.formula(formula_id));

    let add_ons: Vec<_> = line
        .add_on_ids
        .iter()
        .filter_map(|add_on_id| service.add_on(add_on_id))
        .collect();

    let SizeVariation {
        price: size_price,
        duration_minutes: size_duration_minutes,
    } = size_variation;

    let add_ons_price = add_ons
        .iter()
        .try_fold(Decimal::ZERO, |total, add_on| total.checked_add(add_on.price))
        .ok_or_else(|| overflow("price"))?;
    let add_ons_duration_minutes = add_ons
        .iter()
        .try_fold(0u32, |total, add_on| total.checked_add(add_on.duration_minutes))
        .ok_or_else(|| overflow("duration"))?;

    Ok(QuoteLine {
        service_id: service.id.clone(),
        service_name: service.name.clone(),
        vehicle_size_id: size.map(str::to_owned),
        formula_id: formula.map(|formula| formula.id.clone()),
        formula_name: formula.map(|formula| formula.name.clone()),
        add_on_ids: add_ons.iter().map(|add_on| add_on.id.clone()).collect(),

        base_price: service.base_price,
        size_price,
        formula_price: formula.map_or(Decimal::ZERO, |formula| formula.additional_price),
        add_ons_price,

        base_duration_minutes: service.base_duration_minutes,
        size_duration_minutes,
        formula_duration_minutes: formula.map_or(0, |formula| formula.additional_duration_minutes),
        add_ons_duration_minutes,
    })
}

fn overflow(total: &str) -> ShopError {
    ShopError::Validation(format!("cart {total} is too large to book"))
}
