use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use calendar_client::GoogleCalendar;
use calendar_mcp::config::Config;
use calendar_mcp::tools::CalendarAgent;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install crypto provider");
    dotenvy::dotenv().ok();

    // stdout carries the MCP protocol; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var("CALENDAR_AGENT_CONFIG")
        .unwrap_or_else(|_| "calendar-agent.toml".to_string());
    let config = Config::load_or_default(Path::new(&config_path))?;

    tracing::info!("Starting Google Calendar MCP server");

    let provider = GoogleCalendar::connect(&config.calendar).await?;
    let agent = CalendarAgent::new(Arc::new(provider), config)?;

    let service = agent.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Failed to start MCP server: {:?}", e);
    })?;
    service.waiting().await?;

    Ok(())
}
