/// Project API type definitions
///
/// Request and response shapes for the three upstream operations, plus the
/// `ProjectApi` seam. The records are ephemeral: the upstream service owns
/// them, this service only relays identifiers back to the caller.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request to create a project in the upstream workspace
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    /// Workspace the project belongs to
    pub workspace: String,
    /// Team the project is assigned to
    pub team: String,
    /// Human-readable project name
    pub name: String,
    /// Free-text notes block summarizing the submission
    pub notes: String,
}

/// A project as returned by the upstream API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Upstream-assigned globally unique identifier
    pub gid: String,
    pub name: String,
    /// Browser link to the created project
    #[serde(default)]
    pub permalink_url: String,
}

/// Request to create a task inside an existing project
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    /// Parent project identifier
    pub project_gid: String,
    pub name: String,
    pub notes: String,
    /// Due date as `YYYY-MM-DD`
    pub due_on: String,
}

/// A task as returned by the upstream API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub gid: String,
    pub name: String,
}

/// The upstream operations the onboarding saga depends on
///
/// Implemented by `AsanaClient` for real traffic and by in-memory fakes in
/// tests. `archive_project` is the compensation step used when task creation
/// fails partway through.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn create_project(&self, project: &NewProject) -> Result<Project>;
    async fn create_task(&self, task: &NewTask) -> Result<Task>;
    async fn archive_project(&self, gid: &str) -> Result<()>;
}
