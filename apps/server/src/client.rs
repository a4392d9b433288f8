// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the building energy API.

use std::time::Duration;

use gml_energy_processing::{FetchError, FetchResult};
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::StatusCode;

use crate::config::Config;

const BUILDINGS_PATH: &str = "/geospatial/buildings-energy/";

/// Energy API client. Failures are reported as [`FetchError`], never as a hang.
#[derive(Debug, Clone)]
pub struct EnergyApiClient {
    base_url: String,
    community_id: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl EnergyApiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            community_id: config.community_id.clone(),
            token: config.api_token.clone(),
            http,
        })
    }

    /// True when an access credential is configured.
    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    /// Bulk query with colors and CO2 classification.
    pub fn buildings_url(&self) -> String {
        format!(
            "{}{}?community_id={}&format=json&include_colors=true&energy_type=total\
             &time_period=annual&classification=co2&color_scheme=co2_classes",
            self.base_url, BUILDINGS_PATH, self.community_id
        )
    }

    /// Incremental query with the basic field set.
    pub fn updates_url(&self) -> String {
        format!(
            "{}{}?community_id={}&field_type=basic",
            self.base_url, BUILDINGS_PATH, self.community_id
        )
    }

    pub async fn fetch_buildings(&self) -> FetchResult {
        self.get(self.buildings_url(), false).await
    }

    /// Sent with cache-busting headers so intermediaries never serve a stale set.
    pub async fn fetch_updates(&self) -> FetchResult {
        self.get(self.updates_url(), true).await
    }

    async fn get(&self, url: String, no_cache: bool) -> FetchResult {
        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if no_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
                .header(PRAGMA, "no-cache");
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        tracing::debug!(url = %url, bytes = body.len(), "Fetched energy data");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> EnergyApiClient {
        let mut config = Config::from_env();
        config.api_base_url = base.to_string();
        config.community_id = "08417008".to_string();
        config.api_token = None;
        EnergyApiClient::new(&config).unwrap()
    }

    #[test]
    fn urls_carry_community_and_query() {
        let client = client("https://energy.example/");
        assert_eq!(
            client.updates_url(),
            "https://energy.example/geospatial/buildings-energy/?community_id=08417008&field_type=basic"
        );
        assert_eq!(
            client.buildings_url(),
            "https://energy.example/geospatial/buildings-energy/?community_id=08417008&format=json\
             &include_colors=true&energy_type=total&time_period=annual&classification=co2\
             &color_scheme=co2_classes"
        );
        assert!(!client.has_credential());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = client("http://127.0.0.1:9");
        let result = client.fetch_updates().await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
