//! # Availability Handlers
//!
//! Lists the slot start times a customer can pick for a booking of a given
//! duration. Times are wall-clock times in the shop's timezone.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use detailbook_core::models::schedule::AvailabilityResponse;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Length of the booking, usually the quoted total duration
    pub duration_minutes: u32,

    /// Step between candidate starts; falls back to the server default
    pub granularity_minutes: Option<u32>,
}

/// Lists bookable slots for a shop
///
/// # Endpoint
///
/// ```text
/// GET /api/shops/{shop_id}/availability?duration_minutes=85&granularity_minutes=15
/// ```
///
/// The list is a snapshot. A slot shown here can still be taken by someone
/// else before the customer confirms, in which case confirmation answers 409.
///
/// # Errors
///
/// * `ShopError::NotFound` - Shop not found
/// * `ShopError::Validation` - Zero duration or granularity
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(shop_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = state
        .booking
        .available_slots(
            shop_id,
            query.duration_minutes,
            query.granularity_minutes,
            Utc::now(),
        )
        .await?;

    Ok(Json(availability))
}
