/// Server setup and initialization
///
/// Wires configuration, the shared HTTP client, and the optional Asana client
/// into application state, builds the Axum router, and runs the listener.

use crate::{
    api::{create_deal_routes, create_project_routes, AppState},
    asana::{AsanaClient, ProjectApi},
    config::Config,
};
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// The Asana client is only constructed when all three credentials are
/// present; without them the project-creation endpoint reports the missing
/// value per request and the rest of the service works normally.
pub fn create_app(config: Config) -> Result<Router> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("dealbridge/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let project_api = match (
        config.asana.access_token.clone(),
        config.asana.workspace_id.clone(),
        config.asana.team_id.clone(),
    ) {
        (Some(token), Some(workspace), Some(team)) => {
            tracing::info!("🔌 Asana integration enabled");
            let client: Arc<dyn ProjectApi> = Arc::new(AsanaClient::new(token, workspace, team)?);
            Some(client)
        }
        _ => {
            tracing::info!("ℹ️ Asana integration not configured");
            None
        }
    };

    let state = AppState {
        config: Arc::new(config),
        http,
        project_api,
    };

    let app = Router::new()
        .route("/api/health", get(health_check))
        .merge(create_deal_routes())
        .merge(create_project_routes())
        .fallback(not_found)
        .with_state(state);

    Ok(app)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Dealbridge server...");
    log_configuration(&config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_app(config)?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Log which configuration values are set, never their contents
fn log_configuration(config: &Config) {
    let set_or_missing = |present: bool| if present { "✓ set" } else { "✗ missing" };
    tracing::info!("📋 Environment: {}", config.environment);
    tracing::info!("   WEBHOOK_URL: {}", set_or_missing(config.webhook_url.is_some()));
    tracing::info!(
        "   ASANA_ACCESS_TOKEN: {}",
        set_or_missing(config.asana.access_token.is_some())
    );
    tracing::info!(
        "   ASANA_WORKSPACE_ID: {}",
        set_or_missing(config.asana.workspace_id.is_some())
    );
    tracing::info!(
        "   ASANA_TEAM_ID: {}",
        set_or_missing(config.asana.team_id.is_some())
    );
}

/// Health check endpoint handler
///
/// GET /api/health
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback for unknown routes
async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found",
        })),
    )
}
