//! # Detailbook API
//!
//! The API crate provides the web server for the detailing-shop booking flow.
//! It exposes the quote, availability and reservation endpoints the booking UI
//! calls, in that order.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Extract request data and shape responses
//! - **Services**: Run the booking flow against the store traits
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! Storage is reached only through `detailbook_core::ports::ShopStore`, so the
//! server runs against PostgreSQL in production and against mocks in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Booking flow orchestration
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::HeaderValue};
use detailbook_core::ports::ShopStore;
use eyre::Result;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::services::booking::BookingService;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub booking: BookingService,
}

impl ApiState {
    pub fn new(store: Arc<dyn ShopStore>, slot_granularity_minutes: u32) -> Self {
        Self {
            booking: BookingService::new(store, slot_granularity_minutes),
        }
    }
}

/// Builds the application router with all routes attached to `state`
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoint
        .merge(routes::health::routes())
        // Cart pricing
        .merge(routes::quote::routes())
        // Slot listing
        .merge(routes::availability::routes())
        // Booking confirmation
        .merge(routes::reservation::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and store
///
/// Installs the tracing subscriber, applies CORS and timeout layers, and
/// serves until the process is stopped.
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn ShopStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(store, config.slot_granularity_minutes));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Request timeout and tracing
    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
