//! Streamable HTTP transport.

use axum::{Router, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tower_http::trace::TraceLayer;

use crate::tools::TransitTools;

/// Create the HTTP router: MCP at `/mcp`, health check at `/health`.
pub fn create_router(tools: TransitTools) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(tools.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
