// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use gml_energy_processing::PollingConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Base URL of the energy API, without trailing slash.
    pub api_base_url: String,
    /// Community queried by both the bulk and the incremental fetch.
    pub community_id: String,
    /// Bearer token for the energy API. Polling is disabled without it.
    pub api_token: Option<String>,
    /// Request timeout in seconds, for remote fetches and REST handlers.
    pub request_timeout_secs: u64,
    /// Host scheduler tick period in milliseconds.
    pub tick_interval_ms: u64,
    /// Poll interval after a change, in seconds.
    pub poll_fast_secs: f64,
    /// Poll interval once nothing has changed for a while, in seconds.
    pub poll_slow_secs: f64,
    /// Unchanged cycles before switching to the slow interval.
    pub poll_slow_down_threshold: u32,
    /// Adapt the poll interval to observed churn.
    pub adaptive_polling: bool,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            api_base_url: std::env::var("ENERGY_API_BASE_URL")
                .unwrap_or_else(|_| "https://backend.gisworld-tech.com".into())
                .trim_end_matches('/')
                .to_string(),
            community_id: std::env::var("COMMUNITY_ID").unwrap_or_else(|_| "08417008".into()),
            api_token: std::env::var("ENERGY_API_TOKEN")
                .ok()
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            tick_interval_ms: std::env::var("TICK_INTERVAL_MS")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
            poll_fast_secs: std::env::var("POLL_FAST_SECS")
                .unwrap_or_else(|_| "1.0".into())
                .parse()
                .unwrap_or(1.0),
            poll_slow_secs: std::env::var("POLL_SLOW_SECS")
                .unwrap_or_else(|_| "5.0".into())
                .parse()
                .unwrap_or(5.0),
            poll_slow_down_threshold: std::env::var("POLL_SLOW_DOWN_THRESHOLD")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),
            adaptive_polling: std::env::var("ADAPTIVE_POLLING")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| {
                    // Default: allow common development origins
                    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Cadence settings for the change detector.
    pub fn polling(&self) -> PollingConfig {
        PollingConfig {
            fast_interval: self.poll_fast_secs,
            slow_interval: self.poll_slow_secs,
            slow_down_threshold: self.poll_slow_down_threshold,
            adaptive: self.adaptive_polling,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
