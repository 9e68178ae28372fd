use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rmcp::ServiceExt;
use tracing::info;

use transit_mcp::config::ServerConfig;
use transit_mcp::http::create_router;
use transit_mcp::tools::TransitTools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// Streamable HTTP at /mcp
    Http,
}

#[derive(Parser, Debug)]
#[command(name = "transit-mcp")]
#[command(about = "MCP server for transit stop, route and arrival lookups", long_about = None)]
struct Cli {
    /// How to talk to the MCP host
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Address to listen on in HTTP mode
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr: stdout carries the protocol in stdio mode.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("transit_mcp=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    info!(
        transit = %config.onebusaway.base_url,
        geocoder = %config.nominatim.base_url,
        "configuration loaded"
    );

    let tools = TransitTools::new(&config).context("failed to create clients")?;

    match cli.transport {
        Transport::Stdio => {
            info!("serving MCP over stdio");
            let service = tools
                .serve(rmcp::transport::stdio())
                .await
                .context("failed to start stdio server")?;
            service.waiting().await?;
        }
        Transport::Http => {
            let app = create_router(tools);
            let listener = tokio::net::TcpListener::bind(cli.bind)
                .await
                .with_context(|| format!("failed to bind {}", cli.bind))?;
            info!(addr = %cli.bind, "serving MCP over HTTP at /mcp");

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await?;
        }
    }

    Ok(())
}
