use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use detailbook_core::models::reservation::{CreateReservationRequest, CreateReservationResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// `POST /api/shops/{shop_id}/reservations`
///
/// Answers 201 with the frozen quote, or 409 when the slot was taken since it
/// was listed.
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    Path(shop_id): Path<Uuid>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), AppError> {
    let reservation = state.booking.confirm(shop_id, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}
