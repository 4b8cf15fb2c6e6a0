/// Project-creation endpoint
///
/// POST /api/asana/create-deal-project takes the nested `formData` object,
/// synthesizes a display-only application identifier, and runs the onboarding
/// saga: one upstream project, then seven sequential tasks. The response
/// reports per-task outcomes instead of a single collapsed boolean, and a
/// mid-sequence failure archives the partially populated project. Method
/// dispatch happens inside the handler, like the forwarder, so cross-origin
/// preflights get their 204 with CORS headers.

use crate::api::{internal_error, parse_json_body, with_cors, AppState};
use crate::asana::NewProject;
use crate::deal::{missing_fields, DealFormData, REQUIRED_FORM_FIELDS};
use crate::onboarding::{application_id, project_brief, run_onboarding, Compensation, TaskOutcome, TaskReport};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, Router},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// Create the project-creation routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new().route("/api/asana/create-deal-project", any(create_deal_project))
}

/// Create an upstream project and its onboarding task sequence
///
/// POST /api/asana/create-deal-project
/// Body: { "formData": { entityName, entityType, email, phone, ... } }
async fn create_deal_project(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return with_cors(StatusCode::NO_CONTENT.into_response());
    }

    if method != Method::POST {
        tracing::debug!("❌ Rejected {} request to project creator", method);
        return with_cors(
            (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "Method Not Allowed. Use POST." })),
            )
                .into_response(),
        );
    }

    let payload = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("⚠️ Project creation request with unparseable body: {}", e);
            return with_cors(
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "message": "Malformed JSON body",
                    })),
                )
                    .into_response(),
            );
        }
    };

    // formData must be present and an object; anything else is a client
    // error, not an opaque downstream failure.
    let Some(form_value) = payload.get("formData").filter(|v| v.is_object()) else {
        tracing::warn!("⚠️ Project creation request without a formData object");
        return with_cors(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Missing or malformed formData object",
                })),
            )
                .into_response(),
        );
    };

    let missing = missing_fields(form_value, &REQUIRED_FORM_FIELDS);
    if !missing.is_empty() {
        tracing::warn!("⚠️ formData missing required fields: {:?}", missing);
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

    let form: DealFormData = match serde_json::from_value(form_value.clone()) {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("⚠️ formData failed to deserialize: {}", e);
            return with_cors(
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "message": format!("Malformed formData: {}", e),
                    })),
                )
                    .into_response(),
            );
        }
    };

    // Configuration is checked per request so a misconfigured deployment
    // fails with the exact missing value's name.
    let settings = &state.config.asana;
    if settings.access_token.is_none() {
        return with_cors(config_error("ASANA_ACCESS_TOKEN"));
    }
    let Some(workspace) = settings.workspace_id.clone() else {
        return with_cors(config_error("ASANA_WORKSPACE_ID"));
    };
    let Some(team) = settings.team_id.clone() else {
        return with_cors(config_error("ASANA_TEAM_ID"));
    };
    let Some(api) = state.project_api.clone() else {
        tracing::error!("❌ Asana credentials set but no project API client was built");
        return with_cors(internal_error());
    };

    let now = Utc::now();
    let app_id = application_id(now.timestamp_millis());
    let (name, notes) = project_brief(&form, &app_id);
    let project = NewProject {
        workspace,
        team,
        name,
        notes,
    };

    tracing::info!("🏗️ Creating deal project: {} ({})", project.name, app_id);

    let report = match run_onboarding(api.as_ref(), project, &form, now.date_naive()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("❌ Project creation failed: {:#}", e);
            let mut body = json!({
                "success": false,
                "message": e.to_string(),
            });
            if state.config.expose_errors() {
                body["error"] = json!(format!("{:#}", e));
            }
            return with_cors((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response());
        }
    };

    let tasks: Vec<Value> = report.tasks.iter().map(task_report_json).collect();
    let project_json = json!({
        "gid": report.project.gid,
        "name": report.project.name,
        "url": report.project.permalink_url,
    });

    if report.succeeded() {
        tracing::info!("🎉 Project and tasks created for {}", app_id);
        return with_cors(
            Json(json!({
                "success": true,
                "applicationId": app_id,
                "project": project_json,
                "tasks": tasks,
                "message": "Asana project and tasks created successfully",
            }))
            .into_response(),
        );
    }

    let message = report
        .failure_message()
        .unwrap_or("Task creation failed")
        .to_string();
    tracing::error!("❌ Onboarding incomplete for {}: {}", app_id, message);

    let mut body = json!({
        "success": false,
        "message": message,
        "applicationId": app_id,
        "project": project_json,
        "tasks": tasks,
    });
    if let Some(compensation) = compensation_json(&report.compensation) {
        body["compensation"] = compensation;
    }
    if state.config.expose_errors() {
        body["error"] = json!(message);
    }

    with_cors((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
}

fn config_error(name: &str) -> Response {
    tracing::error!("❌ {} not configured", name);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "message": format!("{} not configured", name),
        })),
    )
        .into_response()
}

fn task_report_json(task: &TaskReport) -> Value {
    match &task.outcome {
        TaskOutcome::Created { gid } => json!({
            "name": task.name,
            "dueOn": task.due_on,
            "status": "created",
            "gid": gid,
        }),
        TaskOutcome::Failed { error } => json!({
            "name": task.name,
            "dueOn": task.due_on,
            "status": "failed",
            "error": error,
        }),
        TaskOutcome::Skipped => json!({
            "name": task.name,
            "dueOn": task.due_on,
            "status": "skipped",
        }),
    }
}

fn compensation_json(compensation: &Compensation) -> Option<Value> {
    match compensation {
        Compensation::NotNeeded => None,
        Compensation::Archived => Some(json!("archived")),
        Compensation::ArchiveFailed { .. } => Some(json!("archive_failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asana::{NewTask, Project, ProjectApi, Task};
    use crate::config::tests::test_config;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Fake upstream that succeeds or fails at a chosen step
    struct FakeApi {
        fail_project: bool,
        fail_task_index: Option<usize>,
        task_calls: AtomicUsize,
    }

    impl FakeApi {
        fn ok() -> Self {
            Self {
                fail_project: false,
                fail_task_index: None,
                task_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProjectApi for FakeApi {
        async fn create_project(&self, project: &NewProject) -> anyhow::Result<Project> {
            if self.fail_project {
                return Err(anyhow!("workspace: Not a valid GID"));
            }
            Ok(Project {
                gid: "1200".to_string(),
                name: project.name.clone(),
                permalink_url: "https://app.asana.com/0/1200".to_string(),
            })
        }

        async fn create_task(&self, task: &NewTask) -> anyhow::Result<Task> {
            let index = self.task_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_task_index == Some(index) {
                return Err(anyhow!("task limit reached"));
            }
            Ok(Task {
                gid: format!("t{}", index),
                name: task.name.clone(),
            })
        }

        async fn archive_project(&self, _gid: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn app_with(api: Option<Arc<FakeApi>>, configured: bool) -> Router {
        let mut config = test_config();
        if configured {
            config.asana.access_token = Some("token".to_string());
            config.asana.workspace_id = Some("ws1".to_string());
            config.asana.team_id = Some("team1".to_string());
        }
        let state = AppState {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            project_api: api.map(|a| a as Arc<dyn ProjectApi>),
        };
        create_project_routes().with_state(state)
    }

    fn request(body: Value) -> axum::http::Request<axum::body::Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/asana/create-deal-project")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "formData": {
                "entityName": "Acme Capital",
                "entityType": "LLC",
                "email": "jane@x.com",
                "phone": "+1 555 0100",
                "transactionType": "Acquisition",
            }
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn options_preflight_returns_204_with_cors_headers() {
        let app = app_with(Some(Arc::new(FakeApi::ok())), true);
        let request = axum::http::Request::builder()
            .method("OPTIONS")
            .uri("/api/asana/create-deal-project")
            .header("origin", "https://forms.example.com")
            .header("access-control-request-method", "POST")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "POST,OPTIONS"
        );
    }

    #[tokio::test]
    async fn non_post_method_returns_405() {
        let app = app_with(Some(Arc::new(FakeApi::ok())), true);
        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/api/asana/create-deal-project")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Method Not Allowed. Use POST.");
    }

    #[tokio::test]
    async fn unparseable_body_returns_service_400_shape() {
        let app = app_with(Some(Arc::new(FakeApi::ok())), true);
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/asana/create-deal-project")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], "Malformed JSON body");
    }

    #[tokio::test]
    async fn missing_form_data_returns_400() {
        let app = app_with(Some(Arc::new(FakeApi::ok())), true);
        let response = app.oneshot(request(json!({}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], "Missing or malformed formData object");
    }

    #[tokio::test]
    async fn non_object_form_data_returns_400() {
        let app = app_with(Some(Arc::new(FakeApi::ok())), true);
        let response = app
            .oneshot(request(json!({ "formData": "yes please" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_required_form_fields_return_400() {
        let app = app_with(Some(Arc::new(FakeApi::ok())), true);
        let response = app
            .oneshot(request(json!({ "formData": { "entityType": "LLC" } })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["required"], json!(["entityName", "email"]));
    }

    #[tokio::test]
    async fn missing_configuration_returns_descriptive_500() {
        let app = app_with(None, false);
        let response = app.oneshot(request(valid_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "ASANA_ACCESS_TOKEN not configured");
    }

    #[tokio::test]
    async fn full_success_reports_project_and_tasks() {
        let api = Arc::new(FakeApi::ok());
        let app = app_with(Some(api.clone()), true);
        let response = app.oneshot(request(valid_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert!(body["applicationId"]
            .as_str()
            .unwrap()
            .starts_with("DEAL-"));
        assert_eq!(body["project"]["gid"], "1200");
        assert_eq!(body["project"]["name"], "Acme Capital - Deal Application");
        assert_eq!(body["project"]["url"], "https://app.asana.com/0/1200");
        assert_eq!(body["tasks"].as_array().unwrap().len(), 7);
        assert_eq!(api.task_calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn project_failure_makes_zero_task_calls() {
        let api = Arc::new(FakeApi {
            fail_project: true,
            fail_task_index: None,
            task_calls: AtomicUsize::new(0),
        });
        let app = app_with(Some(api.clone()), true);
        let response = app.oneshot(request(valid_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], "workspace: Not a valid GID");
        assert_eq!(api.task_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn task_failure_reports_per_task_outcomes_and_compensation() {
        let api = Arc::new(FakeApi {
            fail_project: false,
            fail_task_index: Some(2),
            task_calls: AtomicUsize::new(0),
        });
        let app = app_with(Some(api), true);
        let response = app.oneshot(request(valid_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["compensation"], "archived");

        let statuses: Vec<&str> = body["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["status"].as_str().unwrap())
            .collect();
        assert_eq!(
            statuses,
            vec![
                "created", "created", "failed", "skipped", "skipped", "skipped", "skipped"
            ]
        );
    }
}
