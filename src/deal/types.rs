/// Deal submission type definitions
///
/// The onboarding form posts a nested `formData` object; this is its typed
/// shape. Plain forwarder submissions stay as raw JSON values because they are
/// relayed verbatim, never interpreted.

use serde::{Deserialize, Serialize};

/// The onboarding form payload nested under `formData`
///
/// Every field arrives as a string from the web form. Fields without a
/// `#[serde(default)]` fallback are genuinely optional and get display
/// defaults through the accessor methods below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealFormData {
    /// Legal entity submitting the deal; drives the project name
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub entity_type: String,
    /// Primary contact email
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub mandate_size: String,
    #[serde(default)]
    pub transaction_stage: String,
    #[serde(default)]
    pub compliance_status: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub principal_status: String,
    #[serde(default)]
    pub platform_integration: String,
    #[serde(default)]
    pub batman_integration: String,
    pub jurisdiction: Option<String>,
    pub source_of_funds: Option<String>,
    pub timeline: Option<String>,
    pub pricing: Option<String>,
    /// Preferred communication channels, free-form
    #[serde(default)]
    pub comm_channels: Vec<String>,
    /// Assets the deal targets, free-form
    #[serde(default)]
    pub target_assets: Vec<String>,
}

impl DealFormData {
    pub fn jurisdiction_or_default(&self) -> &str {
        self.jurisdiction.as_deref().unwrap_or("Not specified")
    }

    pub fn source_of_funds_or_default(&self) -> &str {
        self.source_of_funds.as_deref().unwrap_or("Not specified")
    }

    pub fn timeline_or_default(&self) -> &str {
        self.timeline.as_deref().unwrap_or("Not specified")
    }

    pub fn pricing_or_default(&self) -> &str {
        self.pricing.as_deref().unwrap_or("TBD")
    }

    pub fn comm_channels_joined(&self) -> String {
        self.comm_channels.join(", ")
    }

    pub fn target_assets_joined(&self) -> String {
        self.target_assets.join(", ")
    }
}
