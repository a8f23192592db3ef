use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/shops/:shop_id/reservations",
        post(handlers::reservation::create_reservation),
    )
}
