/// External project API integration (Asana)
///
/// The service consumes exactly three operations: create project, create task,
/// archive project. They are exposed behind the `ProjectApi` trait so the
/// onboarding saga can run against a fake in tests.

pub mod client;
pub mod types;

pub use client::AsanaClient;
pub use types::{NewProject, NewTask, Project, ProjectApi, Task};
