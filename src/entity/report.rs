//! Report entity for SeaORM.
//!
//! One row per submitted test report. Raw counters arrive from the client;
//! every `total_*`, `*_metric`, percentage, and score field is derived by
//! `services::totals::calculate_totals` before any persist.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "reports")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // Cover information. Portfolio/project names are free text and act as
    // the rollup group key; there is no referential integrity to the
    // lookup tables.
    pub portfolio_name: String,
    pub project_name: String,
    pub sprint_number: i32,
    pub report_version: Option<String>,
    pub report_name: Option<String>,
    pub report_type: String,
    pub cycle_number: i32,
    pub release_number: Option<String>,
    /// Free-text date in DD-MM-YYYY format (legacy wire format).
    pub report_date: Option<String>,
    pub test_environment: Option<String>,
    pub test_summary: Option<String>,
    pub testing_status: String,

    // Opaque JSON sub-documents, round-tripped verbatim.
    #[sea_orm(column_type = "JsonBinary")]
    pub request_data: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub build_data: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub tester_data: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub team_member_data: JsonValue,

    // User stories breakdown.
    pub total_user_stories: i32,
    pub passed_user_stories: i32,
    pub passed_with_issues_user_stories: i32,
    pub failed_user_stories: i32,
    pub blocked_user_stories: i32,
    pub cancelled_user_stories: i32,
    pub deferred_user_stories: i32,
    pub not_testable_user_stories: i32,

    // Test cases breakdown.
    pub total_test_cases: i32,
    pub passed_test_cases: i32,
    pub passed_with_issues_test_cases: i32,
    pub failed_test_cases: i32,
    pub blocked_test_cases: i32,
    pub cancelled_test_cases: i32,
    pub deferred_test_cases: i32,
    pub not_testable_test_cases: i32,

    // Issues by priority and by status. The three status totals are not a
    // clean partition: the generic deferred counter only feeds the six-way
    // legacy total.
    pub total_issues: i32,
    pub total_issues_by_status: i32,
    pub critical_issues: i32,
    pub high_issues: i32,
    pub medium_issues: i32,
    pub low_issues: i32,
    pub new_issues: i32,
    pub fixed_issues: i32,
    pub not_fixed_issues: i32,
    pub reopened_issues: i32,
    pub deferred_issues: i32,
    pub deferred_old_bugs_issues: i32,
    pub total_issues_open_status: i32,
    pub total_issues_resolution_status: i32,

    // Enhancements breakdown.
    pub total_enhancements: i32,
    pub new_enhancements: i32,
    pub implemented_enhancements: i32,
    pub exists_enhancements: i32,

    // Testing metrics (mirror the category totals).
    pub user_stories_metric: i32,
    pub test_cases_metric: i32,
    pub issues_metric: i32,
    pub enhancements_metric: i32,

    // QA notes.
    #[sea_orm(column_type = "JsonBinary")]
    pub qa_notes_data: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub qa_note_fields_data: JsonValue,

    // Automation report sub-documents (legacy snake_case wire names).
    #[sea_orm(column_type = "JsonBinary")]
    #[serde(rename = "covered_services")]
    pub covered_services: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    #[serde(rename = "covered_modules")]
    pub covered_modules: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    #[serde(rename = "bugs")]
    pub bugs: JsonValue,

    // Automation regression counters and derived percentages.
    pub automation_passed_test_cases: i32,
    pub automation_failed_test_cases: i32,
    pub automation_skipped_test_cases: i32,
    pub automation_total_test_cases: i32,
    pub automation_passed_percentage: f64,
    pub automation_failed_percentage: f64,
    pub automation_skipped_percentage: f64,
    pub automation_stable_tests: i32,
    pub automation_flaky_tests: i32,
    pub automation_stability_total: i32,
    pub automation_stable_percentage: f64,
    pub automation_flaky_percentage: f64,

    // Performance report fields.
    pub test_objective: Option<String>,
    pub test_scope: Option<String>,
    pub number_of_users: i32,
    pub execution_duration: Option<String>,
    pub user_load: Option<String>,
    pub response_time: Option<String>,
    pub request_volume: Option<String>,
    pub error_rate: Option<String>,
    pub slowest: Option<String>,
    pub fastest: Option<String>,
    pub total_requests: i32,
    pub failed_requests: i32,
    pub failure_rate: f64,
    #[sea_orm(column_type = "JsonBinary")]
    pub status_codes: JsonValue,
    pub average_response: Option<String>,
    pub average_response_unit: String,
    pub max_response: Option<String>,
    pub max_response_unit: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub performance_scenarios: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub http_requests_data: JsonValue,

    // Evaluation scores, each with a free-text reason.
    pub involvement_score: i32,
    pub involvement_reason: Option<String>,
    pub requirements_quality_score: i32,
    pub requirements_quality_reason: Option<String>,
    pub qa_plan_review_score: i32,
    pub qa_plan_review_reason: Option<String>,
    pub ux_score: i32,
    pub ux_reason: Option<String>,
    pub cooperation_score: i32,
    pub cooperation_reason: Option<String>,
    pub critical_bugs_score: i32,
    pub critical_bugs_reason: Option<String>,
    pub high_bugs_score: i32,
    pub high_bugs_reason: Option<String>,
    pub medium_bugs_score: i32,
    pub medium_bugs_reason: Option<String>,
    pub low_bugs_score: i32,
    pub low_bugs_reason: Option<String>,
    pub final_evaluation_score: i32,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
