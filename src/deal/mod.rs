/// Deal domain module
///
/// Defines the externally submitted deal record, the nested onboarding form
/// payload, and the single required-field validation contract shared by both
/// API entry points.

pub mod types;
pub mod validation;

pub use types::DealFormData;
pub use validation::missing_fields;

/// Required fields for a plain deal submission on the forwarder endpoint
pub const REQUIRED_DEAL_FIELDS: [&str; 3] = ["dealName", "contactName", "contactEmail"];

/// Required fields inside `formData` on the project-creation endpoint
pub const REQUIRED_FORM_FIELDS: [&str; 2] = ["entityName", "email"];
