/// Onboarding task plan
///
/// The seven follow-up tasks every accepted deal gets, in fixed order. Titles
/// and notes templates interpolate submitted form fields; due dates are
/// computed from a caller-supplied "today" so the plan stays deterministic
/// under test.

use crate::deal::DealFormData;
use chrono::{Duration, NaiveDate};

/// Day offsets from "today" for the seven tasks, in creation order
pub const DUE_OFFSETS: [i64; 7] = [1, 2, 3, 5, 7, 10, 14];

/// One planned task, ready to send upstream
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    pub notes: String,
    /// Due date as `YYYY-MM-DD`
    pub due_on: String,
}

/// Format `today + days` as `YYYY-MM-DD`
fn due_date(today: NaiveDate, days: i64) -> String {
    (today + Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// Build the full seven-task plan for one submission
///
/// Order is fixed and meaningful: review before verification before calls
/// before paperwork. The returned specs line up one-to-one with `DUE_OFFSETS`.
pub fn task_plan(form: &DealFormData, today: NaiveDate) -> Vec<TaskSpec> {
    let specs = [
        (
            "📋 Initial Review & Due Diligence".to_string(),
            format!(
                "Review application for {}\n\n\
                 Entity Type: {}\n\
                 Principal Status: {}\n\
                 Transaction Type: {}\n\n\
                 Action Items:\n\
                 - Review entity documentation\n\
                 - Verify principal information\n\
                 - Assess transaction viability\n\
                 - Complete initial risk assessment",
                form.entity_name, form.entity_type, form.principal_status, form.transaction_type
            ),
        ),
        (
            "✅ KYC/AML Verification".to_string(),
            format!(
                "Compliance Status: {}\n\
                 Risk Level: {}\n\
                 Jurisdiction: {}\n\
                 Source of Funds: {}\n\n\
                 Verification Steps:\n\
                 - Identity verification\n\
                 - Address verification\n\
                 - Enhanced due diligence (if required)\n\
                 - Sanctions screening\n\
                 - PEP screening",
                form.compliance_status,
                form.risk_level,
                form.jurisdiction_or_default(),
                form.source_of_funds_or_default()
            ),
        ),
        (
            "📞 Schedule Onboarding Call".to_string(),
            format!(
                "Contact: {}\n\
                 Phone: {}\n\
                 Preferred Channels: {}\n\n\
                 Discussion Topics:\n\
                 - Transaction details and timeline\n\
                 - Compliance requirements\n\
                 - Platform integration process\n\
                 - Next steps and milestones",
                form.email,
                form.phone,
                form.comm_channels_joined()
            ),
        ),
        (
            "🔗 Platform Integration Setup".to_string(),
            format!(
                "Platform Integration: {}\n\
                 BATMAN Integration: {}\n\n\
                 Target Assets: {}\n\n\
                 Setup Tasks:\n\
                 - Configure platform access\n\
                 - Set up BATMAN monitoring\n\
                 - Test integration endpoints\n\
                 - Verify data synchronization",
                form.platform_integration,
                form.batman_integration,
                form.target_assets_joined()
            ),
        ),
        (
            "📄 Master Stack Agreement Preparation".to_string(),
            format!(
                "Transaction Details:\n\
                 - Mandate Size: {}\n\
                 - Transaction Stage: {}\n\
                 - Timeline: {}\n\n\
                 Agreement Items:\n\
                 - Draft master agreement\n\
                 - Include transaction-specific terms\n\
                 - Legal review\n\
                 - Prepare for execution",
                form.mandate_size,
                form.transaction_stage,
                form.timeline_or_default()
            ),
        ),
        (
            "💰 Deal Structuring & Terms".to_string(),
            format!(
                "Target Assets: {}\n\
                 Source of Funds: {}\n\
                 Pricing: {}\n\n\
                 Structuring Tasks:\n\
                 - Define transaction structure\n\
                 - Set pricing and terms\n\
                 - Establish settlement procedures\n\
                 - Create risk mitigation plan",
                form.target_assets_joined(),
                form.source_of_funds_or_default(),
                form.pricing_or_default()
            ),
        ),
        (
            "✓ Final Review & Approval".to_string(),
            "Complete all final checks before deal execution:\n\n\
             Final Checklist:\n\
             - All compliance checks complete\n\
             - Legal agreements signed\n\
             - Platform integration tested\n\
             - Risk assessment approved\n\
             - Management sign-off obtained\n\n\
             Ready for execution once all items verified."
                .to_string(),
        ),
    ];

    specs
        .into_iter()
        .zip(DUE_OFFSETS)
        .map(|((name, notes), days)| TaskSpec {
            name,
            notes,
            due_on: due_date(today, days),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> DealFormData {
        DealFormData {
            entity_name: "Acme Capital".to_string(),
            entity_type: "LLC".to_string(),
            email: "jane@x.com".to_string(),
            phone: "+1 555 0100".to_string(),
            transaction_type: "Acquisition".to_string(),
            compliance_status: "Cleared".to_string(),
            risk_level: "Medium".to_string(),
            comm_channels: vec!["email".to_string(), "phone".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn plan_has_seven_tasks_in_fixed_order() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let plan = task_plan(&sample_form(), today);

        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0].name, "📋 Initial Review & Due Diligence");
        assert_eq!(plan[6].name, "✓ Final Review & Approval");
    }

    #[test]
    fn due_dates_follow_fixed_offsets() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let plan = task_plan(&sample_form(), today);

        let due: Vec<&str> = plan.iter().map(|t| t.due_on.as_str()).collect();
        assert_eq!(
            due,
            vec![
                "2024-03-02",
                "2024-03-03",
                "2024-03-04",
                "2024-03-06",
                "2024-03-08",
                "2024-03-11",
                "2024-03-15"
            ]
        );
    }

    #[test]
    fn due_dates_cross_month_boundaries() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let plan = task_plan(&sample_form(), today);

        assert_eq!(plan[0].due_on, "2024-12-31");
        assert_eq!(plan[1].due_on, "2025-01-01");
        assert_eq!(plan[6].due_on, "2025-01-13");
    }

    #[test]
    fn notes_interpolate_submission_fields() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let plan = task_plan(&sample_form(), today);

        assert!(plan[0].notes.contains("Review application for Acme Capital"));
        assert!(plan[1].notes.contains("Jurisdiction: Not specified"));
        assert!(plan[2].notes.contains("Preferred Channels: email, phone"));
        assert!(plan[5].notes.contains("Pricing: TBD"));
    }
}
