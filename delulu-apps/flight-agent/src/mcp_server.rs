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

//! # Flight Agent Toolkit
//!
//! MCP server registering the flight search and closest airport tools
//! over a shared Amadeus client.

use crate::{AmadeusClient, ClosestAirportRequest, FlightSearchRequest};
use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::{tool, tool_router};
use std::sync::Arc;

pub const FLIGHT_SEARCH_TOOL: &str = "single_flight_search";
pub const CLOSEST_AIRPORT_TOOL: &str = "closest_airport";

#[derive(Clone)]
pub struct FlightAgentServer {
    client: Arc<AmadeusClient>,
    tool_router: ToolRouter<Self>,
}

impl FlightAgentServer {
    pub fn new(client: Arc<AmadeusClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Every tool this server exposes.
    pub fn tools(&self) -> Vec<rmcp::model::Tool> {
        self.tool_router.list_all()
    }
}

#[tool_router]
impl FlightAgentServer {
    #[tool(
        name = "single_flight_search",
        description = "Search for a flight between two airports between earliest and latest departure times. Parameters: originLocationCode (IATA, e.g. BOM), destinationLocationCode (IATA, e.g. JFK), departureDateTimeEarliest and departureDateTimeLatest (YYYY-MM-DDTHH:MM:SS, same calendar date), page_number (10 results per page, default 1). Returns a JSON list of itineraries with price and segments."
    )]
    async fn single_flight_search(
        &self,
        params: Parameters<FlightSearchRequest>,
    ) -> Result<String, String> {
        let request = params.0;
        let itineraries = self
            .client
            .single_flight_search(&request)
            .await
            .map_err(|e| format!("Flight search failed: {e}"))?
            .into_itineraries();

        serde_json::to_string(&itineraries).map_err(|e| e.to_string())
    }

    #[tool(
        name = "closest_airport",
        description = "Find the closest relevant airport to a location. Parameters: latitude and longitude in decimal degrees. Returns the airport IATA code, name, city, distance, or null when none is found."
    )]
    async fn closest_airport(
        &self,
        params: Parameters<ClosestAirportRequest>,
    ) -> Result<String, String> {
        let request = params.0;
        let airport = self
            .client
            .closest_airport(&request)
            .await
            .map_err(|e| format!("Airport search failed: {e}"))?;

        serde_json::to_string(&airport).map_err(|e| e.to_string())
    }
}

impl ServerHandler for FlightAgentServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("Returning {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            tracing::debug!("call_tool: {}", request.name);
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            router.call(context).await
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: Some(
                "Flight offer search and closest airport lookup backed by the Amadeus API."
                    .to_string(),
            ),
        }
    }
}
