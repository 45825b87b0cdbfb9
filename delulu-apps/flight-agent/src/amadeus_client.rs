//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Amadeus API Client
//!
//! Effectful (time, network) access to the Amadeus Self-Service API:
//! OAuth2 client-credentials authentication and authenticated JSON GETs.
//! One request per call, no retries.

use crate::airports_search::NearestAirportsResponse;
use crate::config::AmadeusConfig;
use crate::flight_offers::{FlightOffersQuery, FlightOffersResponse};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use wreq::redirect::Policy;

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
const AIRPORTS_PATH: &str = "/v1/reference-data/locations/airports";

/// A token is refreshed this long before the server-side expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum AmadeusError {
    #[error("network error: {0}")]
    Network(#[from] wreq::Error),
    #[error("authentication failed (HTTP {status}): {detail}")]
    Authentication { status: u16, detail: String },
    #[error("client error (HTTP {status}): {detail}")]
    Client { status: u16, detail: String },
    #[error("server error (HTTP {status}): {detail}")]
    Server { status: u16, detail: String },
    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AmadeusError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = error_detail(body);
        match status {
            401 => AmadeusError::Authentication { status, detail },
            400..=499 => AmadeusError::Client { status, detail },
            _ => AmadeusError::Server { status, detail },
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    code: Option<i64>,
    title: Option<String>,
    detail: Option<String>,
}

/// Best-effort human readable detail from an Amadeus error body.
fn error_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let from_entries = parsed.as_ref().and_then(|b| b.errors.first()).map(|e| {
        let mut parts = Vec::new();
        if let Some(code) = e.code {
            parts.push(format!("[{}]", code));
        }
        if let Some(title) = &e.title {
            parts.push(title.clone());
        }
        if let Some(detail) = &e.detail {
            parts.push(detail.clone());
        }
        parts.join(" ")
    });

    from_entries
        .filter(|s| !s.is_empty())
        .or_else(|| parsed.and_then(|b| b.error_description))
        .unwrap_or_else(|| body.chars().take(300).collect())
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Shared handle to the Amadeus API.
///
/// Cheap to clone; clones share the HTTP connection pool and the access token.
#[derive(Clone)]
pub struct AmadeusClient {
    client: Arc<wreq::Client>,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl AmadeusClient {
    pub fn new(config: &AmadeusConfig) -> Result<Self, AmadeusError> {
        let client = wreq::Client::builder()
            .redirect(Policy::default())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: config.resolved_base_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AmadeusClient {
    async fn fetch_access_token(&self) -> Result<AccessToken, AmadeusError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let form = format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.client_secret)
        );

        tracing::debug!("[auth] Requesting access token from {}", url);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // The token endpoint answers bad credentials with 400 or 401.
            return Err(AmadeusError::Authentication {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        tracing::debug!("[auth] Access token valid for {}s", token.expires_in);
        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    async fn access_token(&self) -> Result<String, AmadeusError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }
        let token = self.fetch_access_token().await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Authenticated GET of `path` with URL-encoded query parameters.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, AmadeusError> {
        let token = self.access_token().await?;
        let url = format!("{}{}?{}", self.base_url, path, encode_query(params));

        let http_start = Instant::now();
        tracing::trace!("[get_json] Starting HTTP request to: {}", url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json, application/vnd.amadeus+json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            "[get_json] HTTP Status: {} {} in {:?}, {} KB",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            http_start.elapsed(),
            body.len() / 1024
        );

        if !status.is_success() {
            return Err(AmadeusError::from_status(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /v2/shopping/flight-offers`
    pub async fn flight_offers_search(
        &self,
        query: &FlightOffersQuery,
    ) -> Result<FlightOffersResponse, AmadeusError> {
        self.get_json(FLIGHT_OFFERS_PATH, &query.to_params()).await
    }

    /// `GET /v1/reference-data/locations/airports`, sorted by relevance.
    pub async fn airport_nearest_relevant(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NearestAirportsResponse, AmadeusError> {
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
        ];
        self.get_json(AIRPORTS_PATH, &params).await
    }
}

fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
