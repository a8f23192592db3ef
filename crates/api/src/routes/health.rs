use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ApiState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub slot_granularity_minutes: u32,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        slot_granularity_minutes: state.booking.slot_granularity_minutes(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/health", get(health_check))
}
