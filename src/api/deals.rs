/// Deal submission forwarder endpoint
///
/// Accepts a form submission, checks the three required fields, and either
/// relays the payload to the configured webhook (passing the upstream reply
/// through) or acknowledges receipt locally when no webhook is set. Method
/// dispatch happens inside the handler so OPTIONS preflights and wrong-method
/// requests get their exact status codes.

use crate::api::{internal_error, parse_json_body, with_cors, AppState};
use crate::deal::{missing_fields, REQUIRED_DEAL_FIELDS};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, Router},
    Json,
};
use serde_json::{json, Value};

/// Create the deal forwarder routes
pub fn create_deal_routes() -> Router<AppState> {
    Router::new().route("/api/deals", any(handle_deal_submission))
}

/// Handle one deal submission
///
/// POST /api/deals
/// Body: JSON object with at least dealName, contactName, contactEmail
async fn handle_deal_submission(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return with_cors(StatusCode::NO_CONTENT.into_response());
    }

    if method != Method::POST {
        tracing::debug!("❌ Rejected {} request to deal forwarder", method);
        return with_cors(
            (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "Method Not Allowed. Use POST." })),
            )
                .into_response(),
        );
    }

    // Empty body is treated as an empty submission; a body that is present
    // but not valid UTF-8 JSON is an internal error, matching the contract.
    let payload = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("❌ Failed to parse deal submission body: {}", e);
            return with_cors(internal_error());
        }
    };

    let missing = missing_fields(&payload, &REQUIRED_DEAL_FIELDS);
    if !missing.is_empty() {
        tracing::warn!("⚠️ Deal submission missing required fields: {:?}", missing);
        return with_cors(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing required fields",
                    "required": missing,
                })),
            )
                .into_response(),
        );
    }

    if let Some(webhook_url) = state.config.webhook_url.clone() {
        return with_cors(forward_to_webhook(&state, &webhook_url, &payload).await);
    }

    // No webhook configured: acknowledge locally with the parsed deal fields.
    tracing::info!("📥 Deal received (no webhook configured)");
    with_cors(
        Json(json!({
            "ok": true,
            "message": "Deal received (no webhook configured)",
            "deal": {
                "dealName": payload["dealName"],
                "contactName": payload["contactName"],
                "contactEmail": payload["contactEmail"],
                "amount": payload.get("amount").cloned().unwrap_or(Value::Null),
            },
            "ts": chrono::Utc::now().timestamp_millis(),
        }))
        .into_response(),
    )
}

/// Relay the submission to the webhook and pass the upstream reply through
///
/// JSON upstream bodies are decoded and wrapped under `upstream` with an `ok`
/// flag; anything else is streamed back byte-for-byte with the original
/// content type. The upstream status code is relayed verbatim either way.
async fn forward_to_webhook(state: &AppState, webhook_url: &str, payload: &Value) -> Response {
    tracing::info!("🔗 Forwarding deal submission to webhook");

    let upstream = match state.http.post(webhook_url).json(payload).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("❌ Webhook request failed: {}", e);
            return internal_error();
        }
    };

    // reqwest and axum sit on different http crate versions; carry the status
    // across as a bare u16.
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = upstream
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.contains("application/json") {
        match upstream.json::<Value>().await {
            Ok(data) => (
                status,
                Json(json!({
                    "ok": status.as_u16() < 400,
                    "upstream": data,
                })),
            )
                .into_response(),
            Err(e) => {
                tracing::error!("❌ Failed to decode upstream JSON response: {}", e);
                internal_error()
            }
        }
    } else {
        let bytes = match upstream.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("❌ Failed to read upstream response body: {}", e);
                return internal_error();
            }
        };

        let content_type = if content_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            content_type
        };

        let mut response = (status, bytes.to_vec()).into_response();
        if let Ok(value) = HeaderValue::from_str(&content_type) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }
}
