/// Deal onboarding saga
///
/// Turns one validated form submission into one upstream project plus seven
/// follow-up tasks. Project creation is the gate: if it fails, nothing else
/// is attempted. Task creation runs strictly sequentially with every step's
/// outcome recorded; the first failure skips the remaining tasks and triggers
/// a compensating project archive so no half-populated project lingers in the
/// upstream workspace.

pub mod tasks;

pub use tasks::{task_plan, TaskSpec, DUE_OFFSETS};

use crate::asana::{NewProject, NewTask, Project, ProjectApi};
use crate::deal::DealFormData;
use anyhow::Result;
use chrono::NaiveDate;

/// Display-only application identifier: "DEAL-" + last six digits of the
/// submission's millisecond timestamp. Not a durable key; collisions accepted.
pub fn application_id(now_millis: i64) -> String {
    let digits = now_millis.to_string();
    let tail = digits.len().saturating_sub(6);
    format!("DEAL-{}", &digits[tail..])
}

/// Build the project name and free-text notes block for one submission
pub fn project_brief(form: &DealFormData, application_id: &str) -> (String, String) {
    let name = format!("{} - Deal Application", form.entity_name);
    let notes = format!(
        "Application ID: {}\n\
         Entity: {}\n\
         Type: {}\n\
         Contact: {}\n\
         Phone: {}\n\
         Transaction Type: {}\n\
         Mandate Size: {}\n\
         Transaction Stage: {}\n\
         Compliance Status: {}\n\
         Risk Level: {}\n\
         Jurisdiction: {}\n\
         Platform Integration: {}\n\
         BATMAN Integration: {}",
        application_id,
        form.entity_name,
        form.entity_type,
        form.email,
        form.phone,
        form.transaction_type,
        form.mandate_size,
        form.transaction_stage,
        form.compliance_status,
        form.risk_level,
        form.jurisdiction_or_default(),
        form.platform_integration,
        form.batman_integration,
    );
    (name, notes)
}

/// Outcome of one task-creation step
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Task exists upstream
    Created { gid: String },
    /// The upstream call failed; error message preserved for the report
    Failed { error: String },
    /// Not attempted because an earlier task failed
    Skipped,
}

/// Per-task record in the saga report
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub name: String,
    pub due_on: String,
    pub outcome: TaskOutcome,
}

/// What happened to the project after a mid-sequence task failure
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    /// All tasks created; nothing to compensate
    NotNeeded,
    /// Partially populated project was archived upstream
    Archived,
    /// Archive attempt itself failed; project remains visible upstream
    ArchiveFailed { error: String },
}

/// Full record of one onboarding run
#[derive(Debug, Clone)]
pub struct OnboardingReport {
    pub project: Project,
    pub tasks: Vec<TaskReport>,
    pub compensation: Compensation,
}

impl OnboardingReport {
    /// True when the project and every task were created
    pub fn succeeded(&self) -> bool {
        self.tasks
            .iter()
            .all(|t| matches!(t.outcome, TaskOutcome::Created { .. }))
    }

    /// Error message of the first failed task, if any
    pub fn failure_message(&self) -> Option<&str> {
        self.tasks.iter().find_map(|t| match &t.outcome {
            TaskOutcome::Failed { error } => Some(error.as_str()),
            _ => None,
        })
    }
}

/// Run the onboarding saga for one submission
///
/// Returns `Err` only when project creation fails (zero tasks attempted).
/// Task failures do not short-circuit into `Err`: the report records exactly
/// which tasks were created, which failed, and which were skipped, plus the
/// compensation outcome. The caller decides the response status from
/// `OnboardingReport::succeeded`.
pub async fn run_onboarding(
    api: &dyn ProjectApi,
    project: NewProject,
    form: &DealFormData,
    today: NaiveDate,
) -> Result<OnboardingReport> {
    let created = api.create_project(&project).await?;

    let plan = task_plan(form, today);
    let mut reports = Vec::with_capacity(plan.len());
    let mut failed = false;

    for spec in plan {
        if failed {
            reports.push(TaskReport {
                name: spec.name,
                due_on: spec.due_on,
                outcome: TaskOutcome::Skipped,
            });
            continue;
        }

        let request = NewTask {
            project_gid: created.gid.clone(),
            name: spec.name.clone(),
            notes: spec.notes,
            due_on: spec.due_on.clone(),
        };

        match api.create_task(&request).await {
            Ok(task) => reports.push(TaskReport {
                name: spec.name,
                due_on: spec.due_on,
                outcome: TaskOutcome::Created { gid: task.gid },
            }),
            Err(e) => {
                tracing::error!("❌ Task creation failed for '{}': {}", spec.name, e);
                failed = true;
                reports.push(TaskReport {
                    name: spec.name,
                    due_on: spec.due_on,
                    outcome: TaskOutcome::Failed {
                        error: e.to_string(),
                    },
                });
            }
        }
    }

    let compensation = if failed {
        match api.archive_project(&created.gid).await {
            Ok(()) => {
                tracing::warn!("📦 Archived partially populated project {}", created.gid);
                Compensation::Archived
            }
            Err(e) => {
                tracing::error!("❌ Failed to archive project {}: {}", created.gid, e);
                Compensation::ArchiveFailed {
                    error: e.to_string(),
                }
            }
        }
    } else {
        Compensation::NotNeeded
    };

    Ok(OnboardingReport {
        project: created,
        tasks: reports,
        compensation,
    })
}
