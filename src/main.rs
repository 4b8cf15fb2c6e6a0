/// Dealbridge: deal-intake HTTP glue service
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use dealbridge::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Deal submission forwarding at POST /api/deals
/// - Asana project provisioning at POST /api/asana/create-deal-project
/// - Health check at GET /api/health
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3001 with no integrations)
    let config = Config::from_env();

    // Start the server
    start_server(config).await?;

    Ok(())
}
