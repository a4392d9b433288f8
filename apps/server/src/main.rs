// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GML-Energy Server - building energy cache with real-time updates.
//!
//! Loads every building of a community from the energy API, keeps the cache
//! fresh through adaptive polling and answers lookup and point queries.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/buildings/:id` - Cached record, either ID format
//! - `DELETE /api/v1/buildings` - Clear the cache
//! - `POST /api/v1/buildings/:id/validate` - Point-in-footprint check
//! - `POST /api/v1/buildings/:id/display` - Show a building in the display slot
//! - `GET /api/v1/display` - Currently displayed building
//! - `POST /api/v1/locate` - Building containing a point
//! - `GET /api/v1/style` - 3D Tiles style document
//! - `GET /api/v1/changes` - Last changed buildings
//! - `GET /api/v1/stats` - Cache and polling statistics
//! - `POST /api/v1/polling` - Polling interval and adaptive mode
//! - `POST /api/v1/refresh` - Full reload

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use gml_energy_processing::EnergyMonitor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod client;
mod config;
mod error;
mod host;
mod routes;
mod sinks;
mod types;

use client::EnergyApiClient;
use config::Config;
use host::HostState;

/// Application state shared across handlers and the host loop.
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<Mutex<HostState>>,
    pub client: Arc<EnergyApiClient>,
    pub config: Arc<Config>,
    /// Clock origin for the display slot.
    pub started: Instant,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = EnergyApiClient::new(&config).context("Failed to build HTTP client")?;
        let monitor = EnergyMonitor::new(config.polling());
        Ok(Self {
            host: Arc::new(Mutex::new(HostState::new(monitor))),
            client: Arc::new(client),
            config: Arc::new(config),
            started: Instant::now(),
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();
    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Building queries
        .route("/api/v1/buildings", delete(routes::monitor::clear))
        .route("/api/v1/buildings/:id", get(routes::buildings::get_building))
        .route("/api/v1/buildings/:id/validate", post(routes::buildings::validate))
        .route("/api/v1/buildings/:id/display", post(routes::buildings::show))
        .route("/api/v1/display", get(routes::buildings::current_display))
        .route("/api/v1/locate", post(routes::buildings::locate))
        // Styling and change feed
        .route("/api/v1/style", get(routes::style::get_style))
        .route("/api/v1/changes", get(routes::monitor::changes))
        .route("/api/v1/stats", get(routes::monitor::stats))
        // Control
        .route("/api/v1/polling", post(routes::monitor::polling))
        .route("/api/v1/refresh", post(routes::monitor::refresh))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,gml_energy_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        api = %config.api_base_url,
        community_id = %config.community_id,
        has_credential = config.api_token.is_some(),
        poll_fast_secs = config.poll_fast_secs,
        poll_slow_secs = config.poll_slow_secs,
        adaptive = config.adaptive_polling,
        "Starting GML-Energy Server"
    );
    if config.api_token.is_none() {
        tracing::warn!("ENERGY_API_TOKEN not set, real-time polling is disabled");
    }

    let port = config.port;
    let state = AppState::new(config)?;

    host::spawn_initial_load(state.clone());
    tokio::spawn(host::run(state.clone()));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
