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

//! # Closest Airport Lookup
//!
//! Finds the most relevant airport around a coordinate with the Amadeus
//! Airport Nearest Relevant API.

use crate::amadeus_client::AmadeusClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ClosestAirportRequest {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl ClosestAirportRequest {
    fn validate(&self) -> Result<(), AirportSearchError> {
        let lat_ok = (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(AirportSearchError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

#[derive(Debug, Error)]
pub enum AirportSearchError {
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearestAirportsResponse {
    #[serde(default)]
    pub data: Vec<AirportLocation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportLocation {
    pub iata_code: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<AirportAddress>,
    #[serde(default)]
    pub distance: Option<Distance>,
    #[serde(default)]
    pub relevance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportAddress {
    pub city_name: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Distance {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClosestAirport {
    pub iata_code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl From<AirportLocation> for ClosestAirport {
    fn from(location: AirportLocation) -> Self {
        let (city_name, country_code) = location
            .address
            .map(|a| (a.city_name, a.country_code))
            .unwrap_or_default();
        Self {
            iata_code: location.iata_code,
            name: location.name,
            city_name,
            country_code,
            distance: location.distance,
            relevance: location.relevance,
        }
    }
}

/// Highest relevance airport; ties keep the API order.
pub fn most_relevant(response: NearestAirportsResponse) -> Option<ClosestAirport> {
    response
        .data
        .into_iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            let ra = a.relevance.unwrap_or(f64::MIN);
            let rb = b.relevance.unwrap_or(f64::MIN);
            ra.total_cmp(&rb).then(ib.cmp(ia))
        })
        .map(|(_, location)| location.into())
}

impl AmadeusClient {
    /// Closest relevant airport, `None` when nothing is found or the API fails.
    pub async fn closest_airport(
        &self,
        request: &ClosestAirportRequest,
    ) -> Result<Option<ClosestAirport>, AirportSearchError> {
        request.validate()?;

        tracing::info!(
            "Looking up airports near ({}, {})",
            request.latitude,
            request.longitude
        );
        match self
            .airport_nearest_relevant(request.latitude, request.longitude)
            .await
        {
            Ok(response) => {
                tracing::debug!("{} airports returned", response.data.len());
                Ok(most_relevant(response))
            }
            Err(e) => {
                tracing::error!("Amadeus API error: {}", e);
                Ok(None)
            }
        }
    }
}
