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

//! # Flight Offers Wire Types
//!
//! Side-effect free request and response shapes of the Amadeus
//! Flight Offers Search API. Only the fields the search tool reads are
//! modelled; everything else in the payload is ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query for a one-way search on a single departure date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightOffersQuery {
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
}

impl FlightOffersQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("originLocationCode", self.origin_location_code.clone()),
            ("destinationLocationCode", self.destination_location_code.clone()),
            (
                "departureDate",
                self.departure_date.format("%Y-%m-%d").to_string(),
            ),
            ("adults", self.adults.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightOffersResponse {
    /// Absent when the API has nothing to say, which is not an error.
    #[serde(default)]
    pub data: Option<Vec<FlightOffer>>,
    #[serde(default)]
    pub dictionaries: Dictionaries,
}

/// Response-scoped code to name tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pub currencies: HashMap<String, String>,
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

impl Dictionaries {
    pub fn currency_name(&self, code: &str) -> String {
        self.currencies
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    pub fn carrier_name(&self, code: &str) -> String {
        self.carriers
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightOffer {
    #[serde(default)]
    pub id: Option<String>,
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<OfferItinerary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferPrice {
    pub total: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferItinerary {
    #[serde(default)]
    pub segments: Vec<OfferSegment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSegment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub carrier_code: String,
    pub number: String,
}

/// Departure or arrival of a segment, passed through to tool output as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Local time, `YYYY-MM-DDTHH:MM:SS`.
    pub at: String,
}
