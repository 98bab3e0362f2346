//! Response models for the latest-project-data endpoint.

use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Values copied from the project's most recent report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestData {
    pub sprint_number: i32,
    pub cycle_number: i32,
    pub release_number: String,
    pub report_version: String,
    pub report_date: Option<String>,
    pub tester_data: JsonValue,
    pub team_members: JsonValue,
}

/// Suggested sprint/cycle/release for the next report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedValues {
    pub sprint_number: i32,
    pub cycle_number: i32,
    pub release_number: String,
}

/// Starting values when the project has no reports yet.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefaultValues {
    pub sprint_number: i32,
    pub cycle_number: i32,
    pub release_number: String,
    pub report_version: String,
    pub report_date: String,
    pub tester_data: JsonValue,
    pub team_members: JsonValue,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestDataResponse {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_data: Option<LatestData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_values: Option<SuggestedValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_values: Option<DefaultValues>,
}
