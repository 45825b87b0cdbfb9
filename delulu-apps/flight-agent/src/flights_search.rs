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

//! # Single Flight Search
//!
//! Searches one-way flight offers between two airports departing within a
//! same-day time window, and returns one page of simplified itineraries.
//!
//! The Amadeus API takes a single departure date, so the window is sent as
//! the date of its latest bound and the time of day is filtered client side.
//! Recoverable failures (multi-day window, API errors) degrade to an empty
//! page; only malformed timestamps are reported as errors.

use crate::amadeus_client::{AmadeusClient, AmadeusError};
use crate::flight_offers::{
    Dictionaries, FlightEndpoint, FlightOffer, FlightOffersQuery, FlightOffersResponse,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const RESULTS_PER_PAGE: i64 = 10;

fn default_page_number() -> i64 {
    1
}

/// Tool input. Field names are part of the tool contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightSearchRequest {
    /// IATA code for the origin airport (e.g. BOM)
    #[serde(rename = "originLocationCode")]
    pub origin_location_code: String,
    /// IATA code for the destination airport (e.g. JFK)
    #[serde(rename = "destinationLocationCode")]
    pub destination_location_code: String,
    /// Earliest departure in ISO format: "YYYY-MM-DDTHH:MM:SS"
    #[serde(rename = "departureDateTimeEarliest")]
    pub departure_date_time_earliest: String,
    /// Latest departure in ISO format: "YYYY-MM-DDTHH:MM:SS"
    #[serde(rename = "departureDateTimeLatest")]
    pub departure_date_time_latest: String,
    /// Page number of results to fetch (pagination)
    #[serde(default = "default_page_number")]
    pub page_number: i64,
}

impl FlightSearchRequest {
    pub fn new(
        origin_location_code: impl Into<String>,
        destination_location_code: impl Into<String>,
        departure_date_time_earliest: impl Into<String>,
        departure_date_time_latest: impl Into<String>,
    ) -> Self {
        Self {
            origin_location_code: origin_location_code.into(),
            destination_location_code: destination_location_code.into(),
            departure_date_time_earliest: departure_date_time_earliest.into(),
            departure_date_time_latest: departure_date_time_latest.into(),
            page_number: default_page_number(),
        }
    }

    pub fn page_number(mut self, page_number: i64) -> Self {
        self.page_number = page_number;
        self
    }

    /// Parse both bounds of the departure window.
    pub fn departure_window(&self) -> Result<(NaiveDateTime, NaiveDateTime), FlightSearchError> {
        let earliest = parse_datetime(
            "departureDateTimeEarliest",
            &self.departure_date_time_earliest,
        )?;
        let latest = parse_datetime("departureDateTimeLatest", &self.departure_date_time_latest)?;
        Ok((earliest, latest))
    }
}

#[derive(Debug, Error)]
pub enum FlightSearchError {
    #[error("invalid {field} '{value}', expected YYYY-MM-DDTHH:MM:SS: {source}")]
    InvalidDateTime {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

fn parse_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, FlightSearchError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|source| {
        FlightSearchError::InvalidDateTime {
            field,
            value: value.to_string(),
            source,
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Price {
    pub total: String,
    /// Currency name when the response names it, otherwise its code.
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub flight_number: String,
    /// Carrier name when the response names it, otherwise its code.
    pub carrier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Itinerary {
    pub price: Price,
    pub segments: Vec<Segment>,
}

impl Itinerary {
    fn from_offer(offer: &FlightOffer, dictionaries: &Dictionaries) -> Option<Self> {
        // Return legs of round-trip offers are out of scope.
        let Some(outbound) = offer.itineraries.first() else {
            tracing::warn!("Skipping offer {:?}: no itineraries", offer.id);
            return None;
        };
        if outbound.segments.is_empty() {
            tracing::warn!("Skipping offer {:?}: itinerary has no segments", offer.id);
            return None;
        }

        let segments = outbound
            .segments
            .iter()
            .map(|segment| Segment {
                departure: segment.departure.clone(),
                arrival: segment.arrival.clone(),
                flight_number: segment.number.clone(),
                carrier: dictionaries.carrier_name(&segment.carrier_code),
            })
            .collect();

        Some(Itinerary {
            price: Price {
                total: offer.price.total.clone(),
                currency: dictionaries.currency_name(&offer.price.currency),
            },
            segments,
        })
    }

    /// Departure time of the first segment, if it parses.
    pub fn departure_time(&self) -> Option<NaiveDateTime> {
        let at = &self.segments.first()?.departure.at;
        NaiveDateTime::parse_from_str(at, DATETIME_FORMAT).ok()
    }
}

/// Simplify every offer of a response, in response order.
pub fn itineraries_from_response(response: &FlightOffersResponse) -> Vec<Itinerary> {
    let Some(offers) = &response.data else {
        tracing::debug!("Response carries no data");
        return Vec::new();
    };
    offers
        .iter()
        .filter_map(|offer| Itinerary::from_offer(offer, &response.dictionaries))
        .collect()
}

/// Keep itineraries whose first segment departs at or before `latest`.
pub fn departing_by(itineraries: Vec<Itinerary>, latest: NaiveDateTime) -> Vec<Itinerary> {
    itineraries
        .into_iter()
        .filter(|itin| match itin.departure_time() {
            Some(departure) => departure <= latest,
            None => {
                tracing::warn!(
                    "Dropping itinerary with unparseable departure: {:?}",
                    itin.segments.first().map(|s| &s.departure.at)
                );
                false
            }
        })
        .collect()
}

/// Index range of `page_number` within a list of `len` items.
///
/// Bounds behave like list slicing with negative indices: a negative bound
/// counts back from the end, clamped to the list. Page 0 is therefore empty
/// and negative pages select from the tail.
pub fn page_range(len: usize, page_number: i64) -> Range<usize> {
    let len_i = len as i64;
    let start = page_number.saturating_sub(1).saturating_mul(RESULTS_PER_PAGE);
    let end = start.saturating_add(RESULTS_PER_PAGE);
    let clamp = |i: i64| -> usize {
        if i < 0 {
            i.saturating_add(len_i).max(0) as usize
        } else {
            i.min(len_i) as usize
        }
    };
    let (start, end) = (clamp(start), clamp(end));
    start..end.max(start)
}

pub fn paginate(mut itineraries: Vec<Itinerary>, page_number: i64) -> Vec<Itinerary> {
    let range = page_range(itineraries.len(), page_number);
    itineraries.truncate(range.end);
    itineraries.drain(..range.start);
    itineraries
}

/// Result of one search, distinguishing recovered failures from an
/// empty page. Tool callers only ever see [`Self::into_itineraries`].
#[derive(Debug)]
pub enum FlightSearchOutcome {
    Page(Vec<Itinerary>),
    /// The window spans several calendar days; no request was sent.
    DepartureWindowSpansDays { earliest: NaiveDate, latest: NaiveDate },
    /// The API call failed; the error has been logged.
    ApiError(AmadeusError),
}

impl FlightSearchOutcome {
    pub fn into_itineraries(self) -> Vec<Itinerary> {
        match self {
            FlightSearchOutcome::Page(itineraries) => itineraries,
            FlightSearchOutcome::DepartureWindowSpansDays { .. }
            | FlightSearchOutcome::ApiError(_) => Vec::new(),
        }
    }

    pub fn is_recovered_failure(&self) -> bool {
        !matches!(self, FlightSearchOutcome::Page(_))
    }
}

impl From<FlightSearchOutcome> for Vec<Itinerary> {
    fn from(outcome: FlightSearchOutcome) -> Self {
        outcome.into_itineraries()
    }
}

impl AmadeusClient {
    /// Search flights between two airports departing within a same-day window.
    pub async fn single_flight_search(
        &self,
        request: &FlightSearchRequest,
    ) -> Result<FlightSearchOutcome, FlightSearchError> {
        let overall_start = std::time::Instant::now();
        let (earliest, latest) = request.departure_window()?;

        if earliest.date() != latest.date() {
            tracing::error!("Earliest and latest departure must be on the same date.");
            return Ok(FlightSearchOutcome::DepartureWindowSpansDays {
                earliest: earliest.date(),
                latest: latest.date(),
            });
        }

        if request.page_number < 1 {
            tracing::warn!(
                "page_number {} is below 1, page is selected from the end of the results",
                request.page_number
            );
        }

        let query = FlightOffersQuery {
            origin_location_code: request.origin_location_code.clone(),
            destination_location_code: request.destination_location_code.clone(),
            departure_date: latest.date(),
            adults: 1,
        };
        tracing::info!(
            "Searching flight offers {} -> {} on {}",
            query.origin_location_code,
            query.destination_location_code,
            query.departure_date
        );

        let response = match self.flight_offers_search(&query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Amadeus API error: {}", e);
                return Ok(FlightSearchOutcome::ApiError(e));
            }
        };

        let itineraries = itineraries_from_response(&response);
        let offered = itineraries.len();
        let itineraries = departing_by(itineraries, latest);
        let departing = itineraries.len();
        let page = paginate(itineraries, request.page_number);

        tracing::info!(
            "{} offers, {} departing by {}, {} on page {} ({:?})",
            offered,
            departing,
            latest,
            page.len(),
            request.page_number,
            overall_start.elapsed()
        );
        Ok(FlightSearchOutcome::Page(page))
    }
}
