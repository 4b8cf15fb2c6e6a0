/// Reqwest-based Asana API client
///
/// Thin wrapper over the REST API: bearer-token auth, `{"data": ...}` request
/// and response envelopes, and upstream error messages surfaced verbatim so
/// handlers can relay them.

use crate::asana::types::{NewProject, NewTask, Project, ProjectApi, Task};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Client for the Asana REST API
#[derive(Debug, Clone)]
pub struct AsanaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    workspace_id: String,
    team_id: String,
}

impl AsanaClient {
    /// Create a client bound to one workspace and team
    pub fn new(access_token: String, workspace_id: String, team_id: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("dealbridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token,
            workspace_id,
            team_id,
        })
    }

    /// Override the API base URL (local test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Workspace this client creates projects in
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Team this client assigns projects to
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Send a request with the `{"data": ...}` envelope and unwrap the reply
    async fn send<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        data: Value,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("🌍 Asana request: {} {}", method, url);

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|e| anyhow!("Asana request failed: {}", e))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to read Asana response body: {}", e))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Asana API error ({}): {}",
                status.as_u16(),
                upstream_error_message(&body)
            ));
        }

        serde_json::from_value(body["data"].clone())
            .map_err(|e| anyhow!("Unexpected Asana response shape: {}", e))
    }
}

/// Pull the first message out of Asana's `{"errors":[{"message":...}]}` body
fn upstream_error_message(body: &Value) -> String {
    body["errors"][0]["message"]
        .as_str()
        .unwrap_or("unknown upstream error")
        .to_string()
}

#[async_trait]
impl ProjectApi for AsanaClient {
    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        tracing::info!("🏗️ Creating Asana project: {}", project.name);
        let created: Project = self
            .send(
                reqwest::Method::POST,
                "/projects",
                json!({
                    "workspace": project.workspace,
                    "team": project.team,
                    "name": project.name,
                    "notes": project.notes,
                }),
            )
            .await?;
        tracing::info!("✅ Project created: {}", created.gid);
        Ok(created)
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        tracing::debug!("📝 Creating Asana task: {}", task.name);
        let created: Task = self
            .send(
                reqwest::Method::POST,
                "/tasks",
                json!({
                    "name": task.name,
                    "notes": task.notes,
                    "due_on": task.due_on,
                    "projects": [task.project_gid],
                }),
            )
            .await?;
        tracing::info!("✅ Task created: {} ({})", task.name, created.gid);
        Ok(created)
    }

    async fn archive_project(&self, gid: &str) -> Result<()> {
        tracing::info!("📦 Archiving Asana project: {}", gid);
        let _: Value = self
            .send(
                reqwest::Method::PUT,
                &format!("/projects/{}", gid),
                json!({ "archived": true }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_upstream_error_message() {
        let body = json!({ "errors": [{ "message": "workspace: Not a valid GID" }] });
        assert_eq!(upstream_error_message(&body), "workspace: Not a valid GID");
    }

    #[test]
    fn falls_back_on_unrecognized_error_body() {
        assert_eq!(
            upstream_error_message(&json!({ "detail": "nope" })),
            "unknown upstream error"
        );
    }
}
