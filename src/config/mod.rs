/// Configuration management for the Dealbridge service
///
/// All environment access happens here, once, at startup. Handlers receive
/// the resulting struct through application state so tests can substitute
/// arbitrary configurations without touching the process environment.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Deployment environment name (e.g., "development", "production")
    /// Controls whether error detail is included in 500 response bodies.
    pub environment: String,
    /// Optional webhook URL the deal forwarder relays submissions to
    pub webhook_url: Option<String>,
    /// External project API (Asana) credentials and identifiers
    pub asana: AsanaSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Credentials and identifiers for the external project API
///
/// All three values are optional at load time: the service still serves the
/// forwarder and health endpoints without them. The project-creation endpoint
/// checks for their presence per request and fails with a descriptive message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsanaSettings {
    /// Personal access token used as a bearer credential
    pub access_token: Option<String>,
    /// Workspace the created projects belong to
    pub workspace_id: Option<String>,
    /// Team the created projects are assigned to
    pub team_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing values fall back to development defaults; integration values
    /// (webhook URL, Asana credentials) simply stay unset.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("DEALBRIDGE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("DEALBRIDGE_PORT")
                    .unwrap_or_else(|_| "3001".to_string())
                    .parse()
                    .unwrap_or(3001),
            },
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            webhook_url: std::env::var("WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
            asana: AsanaSettings {
                access_token: std::env::var("ASANA_ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
                workspace_id: std::env::var("ASANA_WORKSPACE_ID").ok().filter(|v| !v.is_empty()),
                team_id: std::env::var("ASANA_TEAM_ID").ok().filter(|v| !v.is_empty()),
            },
        }
    }

    /// Whether internal error detail may be included in response bodies
    pub fn expose_errors(&self) -> bool {
        self.environment != "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
