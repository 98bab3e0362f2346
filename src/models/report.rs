//! Report payload and listing models.

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use utoipa::{IntoParams, ToSchema};

use crate::entity::report;

/// Incoming report body for create and update.
///
/// Every field is optional: on create, missing fields fall back to
/// `default_model`; on update, missing fields leave the stored value
/// untouched. Derived columns (`total_*`, metrics, percentages, the
/// final score) are never accepted from the client.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    // Cover information
    pub portfolio_name: Option<String>,
    pub project_name: Option<String>,
    pub sprint_number: Option<i32>,
    pub report_version: Option<String>,
    pub report_name: Option<String>,
    pub report_type: Option<String>,
    pub cycle_number: Option<i32>,
    pub release_number: Option<String>,
    pub report_date: Option<String>,
    pub test_environment: Option<String>,
    pub test_summary: Option<String>,
    pub testing_status: Option<String>,

    // Opaque sub-documents
    pub request_data: Option<JsonValue>,
    pub build_data: Option<JsonValue>,
    pub tester_data: Option<JsonValue>,
    pub team_member_data: Option<JsonValue>,

    // User stories (raw counters)
    pub passed_user_stories: Option<i32>,
    pub passed_with_issues_user_stories: Option<i32>,
    pub failed_user_stories: Option<i32>,
    pub blocked_user_stories: Option<i32>,
    pub cancelled_user_stories: Option<i32>,
    pub deferred_user_stories: Option<i32>,
    pub not_testable_user_stories: Option<i32>,

    // Test cases (raw counters)
    pub passed_test_cases: Option<i32>,
    pub passed_with_issues_test_cases: Option<i32>,
    pub failed_test_cases: Option<i32>,
    pub blocked_test_cases: Option<i32>,
    pub cancelled_test_cases: Option<i32>,
    pub deferred_test_cases: Option<i32>,
    pub not_testable_test_cases: Option<i32>,

    // Issues (raw counters)
    pub critical_issues: Option<i32>,
    pub high_issues: Option<i32>,
    pub medium_issues: Option<i32>,
    pub low_issues: Option<i32>,
    pub new_issues: Option<i32>,
    pub fixed_issues: Option<i32>,
    pub not_fixed_issues: Option<i32>,
    pub reopened_issues: Option<i32>,
    pub deferred_issues: Option<i32>,
    pub deferred_old_bugs_issues: Option<i32>,

    // Enhancements (raw counters)
    pub new_enhancements: Option<i32>,
    pub implemented_enhancements: Option<i32>,
    pub exists_enhancements: Option<i32>,

    // QA notes
    pub qa_notes_data: Option<JsonValue>,
    pub qa_note_fields_data: Option<JsonValue>,

    // Automation report (legacy snake_case wire names)
    #[serde(rename = "covered_services")]
    pub covered_services: Option<JsonValue>,
    #[serde(rename = "covered_modules")]
    pub covered_modules: Option<JsonValue>,
    #[serde(rename = "bugs")]
    pub bugs: Option<JsonValue>,
    pub automation_passed_test_cases: Option<i32>,
    pub automation_failed_test_cases: Option<i32>,
    pub automation_skipped_test_cases: Option<i32>,
    pub automation_stable_tests: Option<i32>,
    pub automation_flaky_tests: Option<i32>,

    // Performance report
    pub test_objective: Option<String>,
    pub test_scope: Option<String>,
    pub number_of_users: Option<i32>,
    pub execution_duration: Option<String>,
    pub user_load: Option<String>,
    pub response_time: Option<String>,
    pub request_volume: Option<String>,
    pub error_rate: Option<String>,
    pub slowest: Option<String>,
    pub fastest: Option<String>,
    pub total_requests: Option<i32>,
    pub failed_requests: Option<i32>,
    pub status_codes: Option<JsonValue>,
    pub average_response: Option<String>,
    pub average_response_unit: Option<String>,
    pub max_response: Option<String>,
    pub max_response_unit: Option<String>,
    pub performance_scenarios: Option<JsonValue>,
    pub http_requests_data: Option<JsonValue>,

    // Evaluation scores
    pub involvement_score: Option<i32>,
    pub involvement_reason: Option<String>,
    pub requirements_quality_score: Option<i32>,
    pub requirements_quality_reason: Option<String>,
    pub qa_plan_review_score: Option<i32>,
    pub qa_plan_review_reason: Option<String>,
    pub ux_score: Option<i32>,
    pub ux_reason: Option<String>,
    pub cooperation_score: Option<i32>,
    pub cooperation_reason: Option<String>,
    pub critical_bugs_score: Option<i32>,
    pub critical_bugs_reason: Option<String>,
    pub high_bugs_score: Option<i32>,
    pub high_bugs_reason: Option<String>,
    pub medium_bugs_score: Option<i32>,
    pub medium_bugs_reason: Option<String>,
    pub low_bugs_score: Option<i32>,
    pub low_bugs_reason: Option<String>,
}

macro_rules! apply_field {
    ($payload:expr, $model:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $payload.$field.clone() {
                $model.$field = value;
            }
        )+
    };
}

macro_rules! apply_opt_field {
    ($payload:expr, $model:expr, $($field:ident),+ $(,)?) => {
        $(
            if $payload.$field.is_some() {
                $model.$field = $payload.$field.clone();
            }
        )+
    };
}

impl ReportPayload {
    /// Overlay the provided fields onto `model`. Absent fields keep the
    /// model's current value.
    pub fn apply(&self, model: &mut report::Model) {
        apply_field!(
            self,
            model,
            portfolio_name,
            project_name,
            sprint_number,
            report_type,
            cycle_number,
            testing_status,
            request_data,
            build_data,
            tester_data,
            team_member_data,
            passed_user_stories,
            passed_with_issues_user_stories,
            failed_user_stories,
            blocked_user_stories,
            cancelled_user_stories,
            deferred_user_stories,
            not_testable_user_stories,
            passed_test_cases,
            passed_with_issues_test_cases,
            failed_test_cases,
            blocked_test_cases,
            cancelled_test_cases,
            deferred_test_cases,
            not_testable_test_cases,
            critical_issues,
            high_issues,
            medium_issues,
            low_issues,
            new_issues,
            fixed_issues,
            not_fixed_issues,
            reopened_issues,
            deferred_issues,
            deferred_old_bugs_issues,
            new_enhancements,
            implemented_enhancements,
            exists_enhancements,
            qa_notes_data,
            qa_note_fields_data,
            covered_services,
            covered_modules,
            bugs,
            automation_passed_test_cases,
            automation_failed_test_cases,
            automation_skipped_test_cases,
            automation_stable_tests,
            automation_flaky_tests,
            number_of_users,
            total_requests,
            failed_requests,
            status_codes,
            average_response_unit,
            max_response_unit,
            performance_scenarios,
            http_requests_data,
            involvement_score,
            requirements_quality_score,
            qa_plan_review_score,
            ux_score,
            cooperation_score,
            critical_bugs_score,
            high_bugs_score,
            medium_bugs_score,
            low_bugs_score,
        );
        apply_opt_field!(
            self,
            model,
            report_version,
            report_name,
            release_number,
            report_date,
            test_environment,
            test_summary,
            test_objective,
            test_scope,
            execution_duration,
            user_load,
            response_time,
            request_volume,
            error_rate,
            slowest,
            fastest,
            average_response,
            max_response,
            involvement_reason,
            requirements_quality_reason,
            qa_plan_review_reason,
            ux_reason,
            cooperation_reason,
            critical_bugs_reason,
            high_bugs_reason,
            medium_bugs_reason,
            low_bugs_reason,
        );
    }
}

/// Baseline report used as the starting point for create. Counters are
/// zero, sub-documents are empty arrays, versioning fields start at
/// sprint 1 / cycle 1 / release "1.0".
pub fn default_model() -> report::Model {
    let now = chrono::Utc::now();
    report::Model {
        id: 0,
        portfolio_name: String::new(),
        project_name: String::new(),
        sprint_number: 1,
        report_version: Some("1.0".to_string()),
        report_name: None,
        report_type: "sprint".to_string(),
        cycle_number: 1,
        release_number: Some("1.0".to_string()),
        report_date: None,
        test_environment: None,
        test_summary: None,
        testing_status: "pending".to_string(),
        request_data: json!([]),
        build_data: json!([]),
        tester_data: json!([]),
        team_member_data: json!([]),
        total_user_stories: 0,
        passed_user_stories: 0,
        passed_with_issues_user_stories: 0,
        failed_user_stories: 0,
        blocked_user_stories: 0,
        cancelled_user_stories: 0,
        deferred_user_stories: 0,
        not_testable_user_stories: 0,
        total_test_cases: 0,
        passed_test_cases: 0,
        passed_with_issues_test_cases: 0,
        failed_test_cases: 0,
        blocked_test_cases: 0,
        cancelled_test_cases: 0,
        deferred_test_cases: 0,
        not_testable_test_cases: 0,
        total_issues: 0,
        total_issues_by_status: 0,
        critical_issues: 0,
        high_issues: 0,
        medium_issues: 0,
        low_issues: 0,
        new_issues: 0,
        fixed_issues: 0,
        not_fixed_issues: 0,
        reopened_issues: 0,
        deferred_issues: 0,
        deferred_old_bugs_issues: 0,
        total_issues_open_status: 0,
        total_issues_resolution_status: 0,
        total_enhancements: 0,
        new_enhancements: 0,
        implemented_enhancements: 0,
        exists_enhancements: 0,
        user_stories_metric: 0,
        test_cases_metric: 0,
        issues_metric: 0,
        enhancements_metric: 0,
        qa_notes_data: json!([]),
        qa_note_fields_data: json!([]),
        covered_services: json!([]),
        covered_modules: json!([]),
        bugs: json!([]),
        automation_passed_test_cases: 0,
        automation_failed_test_cases: 0,
        automation_skipped_test_cases: 0,
        automation_total_test_cases: 0,
        automation_passed_percentage: 0.0,
        automation_failed_percentage: 0.0,
        automation_skipped_percentage: 0.0,
        automation_stable_tests: 0,
        automation_flaky_tests: 0,
        automation_stability_total: 0,
        automation_stable_percentage: 0.0,
        automation_flaky_percentage: 0.0,
        test_objective: None,
        test_scope: None,
        number_of_users: 0,
        execution_duration: None,
        user_load: None,
        response_time: None,
        request_volume: None,
        error_rate: None,
        slowest: None,
        fastest: None,
        total_requests: 0,
        failed_requests: 0,
        failure_rate: 0.0,
        status_codes: json!([]),
        average_response: None,
        average_response_unit: "ms".to_string(),
        max_response: None,
        max_response_unit: "ms".to_string(),
        performance_scenarios: json!([]),
        http_requests_data: json!([]),
        involvement_score: 0,
        involvement_reason: None,
        requirements_quality_score: 0,
        requirements_quality_reason: None,
        qa_plan_review_score: 0,
        qa_plan_review_reason: None,
        ux_score: 0,
        ux_reason: None,
        cooperation_score: 0,
        cooperation_reason: None,
        critical_bugs_score: 0,
        critical_bugs_reason: None,
        high_bugs_score: 0,
        high_bugs_reason: None,
        medium_bugs_score: 0,
        medium_bugs_reason: None,
        low_bugs_score: 0,
        low_bugs_reason: None,
        final_evaluation_score: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Query parameters for listing reports.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size, clamped to 1..=100.
    #[serde(default = "default_per_page", alias = "perPage")]
    pub per_page: u64,
    /// Case-insensitive substring match on portfolio, project, and
    /// report name.
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<report::Model>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_versioning_defaults() {
        let model = default_model();
        assert_eq!(model.sprint_number, 1);
        assert_eq!(model.cycle_number, 1);
        assert_eq!(model.release_number.as_deref(), Some("1.0"));
        assert_eq!(model.report_version.as_deref(), Some("1.0"));
        assert_eq!(model.testing_status, "pending");
        assert_eq!(model.average_response_unit, "ms");
        assert_eq!(model.tester_data, json!([]));
    }

    #[test]
    fn test_apply_overlays_present_fields_only() {
        let mut model = default_model();
        model.portfolio_name = "Payments".to_string();
        model.release_number = Some("2.3".to_string());

        let payload = ReportPayload {
            project_name: Some("Checkout".to_string()),
            critical_issues: Some(4),
            ..Default::default()
        };
        payload.apply(&mut model);

        assert_eq!(model.project_name, "Checkout");
        assert_eq!(model.critical_issues, 4);
        // Untouched by the payload
        assert_eq!(model.portfolio_name, "Payments");
        assert_eq!(model.release_number.as_deref(), Some("2.3"));
    }

    #[test]
    fn test_payload_parses_camel_case_and_legacy_names() {
        let payload: ReportPayload = serde_json::from_value(json!({
            "portfolioName": "Digital",
            "sprintNumber": 7,
            "covered_services": ["auth", "billing"],
            "deferredOldBugsIssues": 2
        }))
        .unwrap();

        assert_eq!(payload.portfolio_name.as_deref(), Some("Digital"));
        assert_eq!(payload.sprint_number, Some(7));
        assert_eq!(payload.covered_services, Some(json!(["auth", "billing"])));
        assert_eq!(payload.deferred_old_bugs_issues, Some(2));
    }
}
