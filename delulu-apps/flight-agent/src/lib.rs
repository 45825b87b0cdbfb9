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

// Library for delulu-flight-agent
// Amadeus flight offer search as CLI and MCP tools

mod airports_search;
mod amadeus_client;
mod config;
mod flight_offers;
mod flights_search;
#[cfg(feature = "mcp")]
pub mod mcp_server;

// Re-export commonly used items from flights_search
pub use flights_search::*;

pub use airports_search::{
    AirportSearchError, ClosestAirport, ClosestAirportRequest, Distance, NearestAirportsResponse,
    most_relevant,
};
pub use amadeus_client::{AmadeusClient, AmadeusError};
#[cfg(feature = "cli")]
pub use config::AmadeusArgs;
pub use config::{AmadeusConfig, AmadeusHostname, PRODUCTION_BASE_URL, TEST_BASE_URL};
pub use flight_offers::{Dictionaries, FlightEndpoint, FlightOffersQuery, FlightOffersResponse};
