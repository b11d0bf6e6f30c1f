use finance_advisor::{api::start_server, AdvisorConfig, FinanceAssistant};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables (RUST_LOG may come from .env too)
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AdvisorConfig::from_env().map_err(|e| {
        error!("{}", e);
        e
    })?;

    info!("💸 Finance Advisor - API Server");
    info!("📍 Port: {}", config.api_port);

    let assistant = Arc::new(FinanceAssistant::from_config(&config)?);

    info!("✅ Assistant initialized");
    info!("📡 Starting API server...");

    start_server(assistant, config.api_port).await?;

    Ok(())
}
