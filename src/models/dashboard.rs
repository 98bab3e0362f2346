//! Dashboard response models.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::entity::{dashboard_stats, portfolio_stats, project_stats, report};

/// Global aggregation across every report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_reports: i64,
    pub completed_reports: i64,
    pub in_progress_reports: i64,
    pub pending_reports: i64,

    pub total_user_stories: i64,
    pub passed_user_stories: i64,
    pub passed_with_issues_user_stories: i64,
    pub failed_user_stories: i64,
    pub blocked_user_stories: i64,
    pub cancelled_user_stories: i64,
    pub deferred_user_stories: i64,
    pub not_testable_user_stories: i64,

    pub total_test_cases: i64,
    pub passed_test_cases: i64,
    pub passed_with_issues_test_cases: i64,
    pub failed_test_cases: i64,
    pub blocked_test_cases: i64,
    pub cancelled_test_cases: i64,
    pub deferred_test_cases: i64,
    pub not_testable_test_cases: i64,

    pub total_issues: i64,
    pub critical_issues: i64,
    pub high_issues: i64,
    pub medium_issues: i64,
    pub low_issues: i64,
    pub new_issues: i64,
    pub fixed_issues: i64,
    pub not_fixed_issues: i64,
    pub reopened_issues: i64,
    pub deferred_issues: i64,

    pub total_enhancements: i64,
    pub new_enhancements: i64,
    pub implemented_enhancements: i64,
    pub exists_enhancements: i64,

    pub automation_total_test_cases: i64,
    pub automation_passed_test_cases: i64,
    pub automation_failed_test_cases: i64,
    pub automation_skipped_test_cases: i64,
    pub automation_stable_tests: i64,
    pub automation_flaky_tests: i64,
}

/// Per-(portfolio, project) rollup with derived rates and risk level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRollup {
    pub portfolio_name: String,
    pub project_name: String,
    pub total_reports: i64,
    pub last_report_date: Option<String>,
    pub testing_status: String,
    pub risk_level: String,

    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,

    pub passed_user_stories: i64,
    pub passed_with_issues_user_stories: i64,
    pub failed_user_stories: i64,
    pub blocked_user_stories: i64,
    pub cancelled_user_stories: i64,
    pub deferred_user_stories: i64,
    pub not_testable_user_stories: i64,
    pub user_stories_success_rate: f64,

    pub passed_test_cases: i64,
    pub passed_with_issues_test_cases: i64,
    pub failed_test_cases: i64,
    pub blocked_test_cases: i64,
    pub cancelled_test_cases: i64,
    pub deferred_test_cases: i64,
    pub not_testable_test_cases: i64,
    pub test_cases_success_rate: f64,

    pub critical_issues: i64,
    pub high_issues: i64,
    pub medium_issues: i64,
    pub low_issues: i64,

    pub new_issues: i64,
    pub fixed_issues: i64,
    pub not_fixed_issues: i64,
    pub reopened_issues: i64,
    pub deferred_issues: i64,
    pub issues_resolution_rate: f64,

    pub new_enhancements: i64,
    pub implemented_enhancements: i64,
    pub exists_enhancements: i64,

    pub automation_total_tests: i64,
    pub automation_passed_tests: i64,
    pub automation_failed_tests: i64,
    pub automation_skipped_tests: i64,
    pub automation_stable_tests: i64,
    pub automation_flaky_tests: i64,
    pub automation_pass_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatsResponse {
    pub overall: OverallStats,
    pub projects: Vec<ProjectRollup>,
}

/// Cached global snapshot row, as served by the summary endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedOverall {
    pub total_reports: i64,
    pub completed_reports: i64,
    pub in_progress_reports: i64,
    pub pending_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl From<dashboard_stats::Model> for CachedOverall {
    fn from(m: dashboard_stats::Model) -> Self {
        Self {
            total_reports: m.total_reports,
            completed_reports: m.completed_reports,
            in_progress_reports: m.in_progress_reports,
            pending_reports: m.pending_reports,
            total_user_stories: m.total_user_stories,
            total_test_cases: m.total_test_cases,
            total_issues: m.total_issues,
            total_enhancements: m.total_enhancements,
            last_updated: m.last_updated,
        }
    }
}

/// Cached per-portfolio snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedPortfolio {
    pub portfolio_name: String,
    pub total_projects: i64,
    pub total_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_report_date: Option<String>,
}

impl From<portfolio_stats::Model> for CachedPortfolio {
    fn from(m: portfolio_stats::Model) -> Self {
        Self {
            portfolio_name: m.portfolio_name,
            total_projects: m.total_projects,
            total_reports: m.total_reports,
            total_user_stories: m.total_user_stories,
            total_test_cases: m.total_test_cases,
            total_issues: m.total_issues,
            total_enhancements: m.total_enhancements,
            last_report_date: m.last_report_date,
        }
    }
}

/// Cached per-project snapshot row.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedProject {
    pub portfolio_name: String,
    pub project_name: String,
    pub total_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_report_date: Option<String>,
    pub latest_testing_status: Option<String>,
}

impl From<project_stats::Model> for CachedProject {
    fn from(m: project_stats::Model) -> Self {
        Self {
            portfolio_name: m.portfolio_name,
            project_name: m.project_name,
            total_reports: m.total_reports,
            total_user_stories: m.total_user_stories,
            total_test_cases: m.total_test_cases,
            total_issues: m.total_issues,
            total_enhancements: m.total_enhancements,
            last_report_date: m.last_report_date,
            latest_testing_status: m.latest_testing_status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub overall: CachedOverall,
    pub portfolios: Vec<CachedPortfolio>,
    pub projects: Vec<CachedProject>,
}

/// Aggregated view over every report of one project (lookup entity id).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverall {
    pub total_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_release: String,
    pub latest_release_number: String,
    pub user_story_success_rate: f64,
    pub test_case_success_rate: f64,
    pub issue_fix_rate: f64,
    pub enhancement_completion_rate: f64,
    pub passed_user_stories: i64,
    pub passed_test_cases: i64,
    pub fixed_issues: i64,
    pub implemented_enhancements: i64,
    pub total_automation_test_cases: i64,
    pub automation_passed_test_cases: i64,
    pub automation_failed_test_cases: i64,
    pub automation_skipped_test_cases: i64,
    pub automation_stable_tests: i64,
    pub automation_flaky_tests: i64,
    pub automation_pass_rate: f64,
    pub automation_stability_rate: f64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct TimeStats {
    pub monthly: BTreeMap<String, i64>,
    pub quarterly: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectStatsResponse {
    pub overall: ProjectOverall,
    pub testers: Vec<JsonValue>,
    pub reports: Vec<report::Model>,
    pub time_stats: TimeStats,
}
