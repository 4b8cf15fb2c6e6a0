/// Dealbridge: deal-intake HTTP glue service
///
/// This library receives web-form "deal" submissions and either forwards them
/// to a configured webhook, provisions an Asana project with a fixed sequence
/// of onboarding tasks, or acknowledges receipt locally when no integration
/// is configured.

// Core configuration and setup
pub mod config;

// Deal domain - submission types and the shared validation contract
pub mod deal;

// External project API (Asana) client and trait seam
pub mod asana;

// Onboarding saga - project plus seven sequential follow-up tasks
pub mod onboarding;

// HTTP API layer - forwarder and project-creation endpoints
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use asana::{AsanaClient, ProjectApi};
pub use config::Config;
pub use deal::DealFormData;
pub use onboarding::{run_onboarding, OnboardingReport};
pub use server::start_server;
