//! The MCP tool server.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::domain::{RouteDetails, StopArrivals, annotate_distances};
use crate::geocode::{GeocodeOutcome, NominatimClient};
use crate::onebusaway::{DebugDump, OneBusAwayClient};
use crate::pathfind::{RouteSuccessors, find_paths};

use super::dto::{
    ArrivalsParams, GeocodeParams, NearbyParams, NearbyRoutes, NearbyStops, RouteDetailsParams,
    StopPaths, StopPathsParams,
};
use super::error::ToolError;

const INSTRUCTIONS: &str = "Transit lookups backed by OneBusAway. Use 'geocode_address' to turn \
an address into coordinates, 'find_nearby_stops' or 'find_nearby_routes' around a point, \
'get_arrivals_departures' for real-time arrivals at a stop, 'get_route_details' for a route's \
stops and directions, and 'find_stop_paths' to list stop sequences between two stops.";

/// Transit tool server.
///
/// Cheap to clone: clients are shared.
#[derive(Clone)]
pub struct TransitTools {
    transit: Arc<OneBusAwayClient>,
    geocoder: Arc<NominatimClient>,
    tool_router: ToolRouter<Self>,
}

impl TransitTools {
    /// Build clients from `config`.
    pub fn new(config: &ServerConfig) -> Result<Self, ToolError> {
        let mut transit = OneBusAwayClient::new(config.onebusaway.clone())?;
        if let Some(dir) = &config.debug_dump_dir {
            info!(dir = %dir.display(), "dumping raw arrivals responses");
            transit = transit.with_debug_dump(DebugDump::new(dir));
        }

        let geocoder = NominatimClient::new(config.nominatim.clone())?;

        Ok(Self::with_clients(transit, geocoder))
    }

    pub fn with_clients(transit: OneBusAwayClient, geocoder: NominatimClient) -> Self {
        Self {
            transit: Arc::new(transit),
            geocoder: Arc::new(geocoder),
            tool_router: Self::tool_router(),
        }
    }

    /// Resolve an address.
    pub async fn geocode(&self, params: GeocodeParams) -> Result<GeocodeOutcome, ToolError> {
        let address = params.validate()?;
        Ok(self.geocoder.geocode(address).await?)
    }

    /// Stops around a point, nearest first.
    pub async fn nearby_stops(&self, params: NearbyParams) -> Result<NearbyStops, ToolError> {
        let (location, radius_m) = params.validate()?;
        let listing = self.transit.stops_for_location(&location, radius_m).await?;

        Ok(NearbyStops {
            location,
            radius_m,
            stops: annotate_distances(&location, listing.items),
            limit_exceeded: listing.limit_exceeded,
            out_of_range: listing.out_of_range,
        })
    }

    /// Routes serving stops around a point.
    pub async fn nearby_routes(&self, params: NearbyParams) -> Result<NearbyRoutes, ToolError> {
        let (location, radius_m) = params.validate()?;
        let listing = self.transit.routes_for_location(&location, radius_m).await?;

        Ok(NearbyRoutes {
            location,
            radius_m,
            routes: listing.items,
            limit_exceeded: listing.limit_exceeded,
            out_of_range: listing.out_of_range,
        })
    }

    pub async fn arrivals(&self, params: ArrivalsParams) -> Result<StopArrivals, ToolError> {
        let (stop, query) = params.validate()?;
        Ok(self.transit.arrivals_and_departures(&stop, &query).await?)
    }

    pub async fn route_details(
        &self,
        params: RouteDetailsParams,
    ) -> Result<RouteDetails, ToolError> {
        let (route, include_polylines) = params.validate()?;
        Ok(self.transit.route_details(&route, include_polylines).await?)
    }

    /// Simple stop sequences from one stop to another along route patterns.
    pub async fn stop_paths(&self, params: StopPathsParams) -> Result<StopPaths, ToolError> {
        let (start, end, limits) = params.validate()?;

        let successors = RouteSuccessors::new(self.transit.clone());
        let search = find_paths(&successors, &start, &end, &limits).await?;

        Ok(StopPaths {
            start,
            end,
            paths: search.paths,
            stops_expanded: search.stops_expanded,
            truncated: search.truncated,
        })
    }
}

#[tool_router]
impl TransitTools {
    #[tool(description = "Geocode a free-form address to latitude/longitude using OpenStreetMap Nominatim. Returns status 'not_found' when nothing matches.")]
    pub async fn geocode_address(
        &self,
        Parameters(params): Parameters<GeocodeParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "geocode_address", "tool called");
        respond("geocode_address", self.geocode(params).await)
    }

    #[tool(description = "Find transit stops within a radius of a point, nearest first, with distance in metres.")]
    pub async fn find_nearby_stops(
        &self,
        Parameters(params): Parameters<NearbyParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "find_nearby_stops", "tool called");
        respond("find_nearby_stops", self.nearby_stops(params).await)
    }

    #[tool(description = "Find transit routes serving stops within a radius of a point.")]
    pub async fn find_nearby_routes(
        &self,
        Parameters(params): Parameters<NearbyParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "find_nearby_routes", "tool called");
        respond("find_nearby_routes", self.nearby_routes(params).await)
    }

    #[tool(description = "Get real-time and scheduled arrivals and departures at a stop.")]
    pub async fn get_arrivals_departures(
        &self,
        Parameters(params): Parameters<ArrivalsParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_arrivals_departures", stop_id = %params.stop_id, "tool called");
        respond("get_arrivals_departures", self.arrivals(params).await)
    }

    #[tool(description = "Get a route with its stops and the ordered stop sequence for each direction.")]
    pub async fn get_route_details(
        &self,
        Parameters(params): Parameters<RouteDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = "get_route_details", route_id = %params.route_id, "tool called");
        respond("get_route_details", self.route_details(params).await)
    }

    #[tool(description = "List stop sequences from one stop to another by following route stop orders. Paths never repeat a stop; shortest first.")]
    pub async fn find_stop_paths(
        &self,
        Parameters(params): Parameters<StopPathsParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            tool = "find_stop_paths",
            start = %params.start_stop_id,
            end = %params.end_stop_id,
            "tool called"
        );
        respond("find_stop_paths", self.stop_paths(params).await)
    }
}

#[tool_handler]
impl ServerHandler for TransitTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

/// Render a tool outcome: pretty JSON on success, an error result naming
/// the failure otherwise.
fn respond<T: Serialize>(
    tool: &str,
    result: Result<T, ToolError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(e) => {
            warn!(tool, error = %e, "tool failed");
            Ok(CallToolResult::error(vec![Content::text(format!("Error: {e}"))]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::NominatimConfig;
    use crate::onebusaway::OneBusAwayConfig;

    fn tools() -> TransitTools {
        // Unroutable: any request fails, so only pre-request validation passes.
        let transit =
            OneBusAwayClient::new(OneBusAwayConfig::new("k").with_base_url("http://127.0.0.1:1"))
                .unwrap();
        let geocoder =
            NominatimClient::new(NominatimConfig::new("tests").with_base_url("http://127.0.0.1:1"))
                .unwrap();
        TransitTools::with_clients(transit, geocoder)
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[test]
    fn advertises_all_tools() {
        let tools = tools();
        let mut names: Vec<String> = tools
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "find_nearby_routes",
                "find_nearby_stops",
                "find_stop_paths",
                "geocode_address",
                "get_arrivals_departures",
                "get_route_details",
            ]
        );
    }

    #[test]
    fn server_info_enables_tools() {
        let info = tools().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("find_stop_paths"));
    }

    #[tokio::test]
    async fn invalid_params_become_error_results() {
        let result = tools()
            .find_nearby_stops(Parameters(NearbyParams {
                latitude: 200.0,
                longitude: 0.0,
                radius_m: None,
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("Error: invalid parameter"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_result() {
        let result = tools()
            .get_route_details(Parameters(RouteDetailsParams {
                route_id: "1_100224".to_string(),
                include_polylines: None,
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("Error: HTTP error"));
    }

    #[test]
    fn respond_pretty_prints() {
        let result = respond("test", Ok(serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text(&result), "{\n  \"a\": 1\n}");
    }
}
