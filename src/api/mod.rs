/// HTTP API layer
///
/// Two independent request/response translators over external services:
/// - Deal forwarder: validates a submission and relays it to a webhook
/// - Project creator: provisions an upstream project plus onboarding tasks
///
/// Both share one application state and one required-field validation contract.

pub mod deals;
pub mod projects;

pub use deals::create_deal_routes;
pub use projects::create_project_routes;

use crate::asana::ProjectApi;
use crate::config::Config;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;

/// Application state containing shared resources
///
/// Built once at startup from an explicit `Config`; handlers never read the
/// process environment. `project_api` is present only when all Asana
/// credentials are configured, and is a trait object so tests inject fakes.
#[derive(Clone)]
pub struct AppState {
    /// Immutable service configuration
    pub config: Arc<Config>,
    /// Shared HTTP client for webhook forwarding
    pub http: reqwest::Client,
    /// Upstream project API, when configured
    pub project_api: Option<Arc<dyn ProjectApi>>,
}

/// Attach the permissive CORS headers every endpoint answers with
///
/// The service fronts a public web form, so the origin is deliberately `*`.
pub fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST,OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    response
}

/// Parse a raw request body as UTF-8 JSON, treating an empty body as `{}`
///
/// Both endpoints read raw bytes instead of using the `Json` extractor so
/// parse failures get the service's own error shape (and CORS headers)
/// rather than axum's stock rejection.
pub fn parse_json_body(body: &axum::body::Bytes) -> anyhow::Result<serde_json::Value> {
    let raw = std::str::from_utf8(body)?;
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(raw)?)
}

/// Generic 500 for unexpected internal failures; detail stays server-side
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}
