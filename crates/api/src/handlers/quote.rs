//! # Quote Handlers
//!
//! Prices the booking cart while the customer is still choosing services.
//! The UI calls this on every change and uses `total_duration_minutes` to ask
//! for availability.

use axum::{
    Json,
    extract::{Path, State},
};
use detailbook_core::models::quote::{BookingQuote, QuoteRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Computes the price and duration of a cart
///
/// # Endpoint
///
/// ```text
/// POST /api/shops/{shop_id}/quote
/// ```
///
/// An empty `lines` array returns the zero quote. Lines referring to services,
/// formulas or add-ons the shop no longer offers are left out instead of
/// failing the request.
///
/// # Errors
///
/// * `ShopError::NotFound` - Shop not found
/// * `ShopError::Validation` - A line without a service id
#[axum::debug_handler]
pub async fn create_quote(
    State(state): State<Arc<ApiState>>,
    Path(shop_id): Path<Uuid>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<BookingQuote>, AppError> {
    let quote = state.booking.quote(shop_id, &payload.lines).await?;
    Ok(Json(quote))
}
