//! Successors derived from live route stop sequences.
//!
//! The successors of a stop are the stops that immediately follow it in
//! some direction of some route serving it. Answering that takes a `stop`
//! lookup (for the route ids) and one `stops-for-route` lookup per route.
//! Both are cached for the lifetime of the [`RouteSuccessors`], so a search
//! fetches each route at most once.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use moka::future::Cache;
use tracing::debug;

use crate::domain::{RouteId, RouteStops, StopId};
use crate::onebusaway::{OneBusAwayClient, TransitError};

use super::error::PathError;
use super::successors::Successors;

const MAX_CACHED_ROUTES: u64 = 512;
const MAX_CACHED_STOPS: u64 = 16_384;

/// [`Successors`] backed by the OneBusAway API.
pub struct RouteSuccessors {
    client: Arc<OneBusAwayClient>,

    /// Route ids serving each stop.
    stop_routes: Cache<StopId, Arc<Vec<RouteId>>>,

    /// Stop sequences per route.
    routes: Cache<RouteId, Arc<RouteStops>>,
}

impl RouteSuccessors {
    pub fn new(client: Arc<OneBusAwayClient>) -> Self {
        Self {
            client,
            stop_routes: Cache::builder().max_capacity(MAX_CACHED_STOPS).build(),
            routes: Cache::builder().max_capacity(MAX_CACHED_ROUTES).build(),
        }
    }

    /// Number of routes fetched so far.
    pub async fn cached_routes(&self) -> u64 {
        self.routes.run_pending_tasks().await;
        self.routes.entry_count()
    }

    async fn routes_serving(&self, stop: &StopId) -> Result<Arc<Vec<RouteId>>, TransitError> {
        if let Some(routes) = self.stop_routes.get(stop).await {
            return Ok(routes);
        }

        let details = self.client.stop(stop).await?;
        let routes = Arc::new(details.route_ids);
        self.stop_routes.insert(stop.clone(), routes.clone()).await;
        Ok(routes)
    }

    async fn route_stops(&self, route: &RouteId) -> Result<Arc<RouteStops>, TransitError> {
        if let Some(stops) = self.routes.get(route).await {
            return Ok(stops);
        }

        let stops = Arc::new(self.client.stops_for_route(route, false).await?);

        // The response lists every stop on the route along with the routes
        // serving it, which saves a `stop` lookup when we expand them later.
        for stop in &stops.stops {
            if !stop.route_ids.is_empty() {
                self.stop_routes
                    .insert(stop.id.clone(), Arc::new(stop.route_ids.clone()))
                    .await;
            }
        }

        self.routes.insert(route.clone(), stops.clone()).await;
        Ok(stops)
    }
}

impl Successors for RouteSuccessors {
    async fn successors(&self, stop: &StopId) -> Result<Vec<StopId>, PathError> {
        let fail = |e: TransitError| PathError::Successors {
            stop: stop.clone(),
            message: e.to_string(),
        };

        let routes = self.routes_serving(stop).await.map_err(fail)?;

        let fetches = routes.iter().map(|route| self.route_stops(route));
        let results = join_all(fetches).await;

        let mut next = BTreeSet::new();
        for result in results {
            let route_stops = result.map_err(fail)?;
            next.extend(route_stops.next_stops(stop));
        }

        debug!(stop = %stop, routes = routes.len(), successors = next.len(), "fetched successors");

        Ok(next.into_iter().collect())
    }
}
