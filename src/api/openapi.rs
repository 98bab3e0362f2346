//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, entity, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QA Dashboard Server",
        version = "0.1.0",
        description = "API server for multi-tenant QA test report tracking: report CRUD with derived metrics, dashboard rollups, and version suggestions"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Report endpoints
        api::reports::list_reports,
        api::reports::create_report,
        api::reports::get_report,
        api::reports::update_report,
        api::reports::delete_report,
        api::reports::latest_project_data,
        // Dashboard endpoints
        api::dashboard::dashboard_stats,
        api::dashboard::dashboard_summary,
        api::dashboard::refresh_dashboard_stats,
        api::dashboard::project_statistics,
        // Portfolio endpoints
        api::lookups::list_portfolios,
        api::lookups::create_portfolio,
        api::lookups::get_portfolio,
        api::lookups::update_portfolio,
        api::lookups::delete_portfolio,
        api::lookups::portfolio_projects,
        // Project endpoints
        api::lookups::list_projects,
        api::lookups::create_project,
        api::lookups::projects_without_portfolio,
        api::lookups::get_project,
        api::lookups::update_project,
        api::lookups::delete_project,
        api::lookups::project_testers,
        // Tester endpoints
        api::lookups::list_testers,
        api::lookups::create_tester,
        api::lookups::get_tester,
        api::lookups::update_tester,
        api::lookups::delete_tester,
        api::lookups::set_tester_projects,
        // Team member endpoints
        api::lookups::list_team_members,
        api::lookups::create_team_member,
        api::lookups::get_team_member,
        api::lookups::update_team_member,
        api::lookups::delete_team_member,
        // Form data
        api::lookups::form_data,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Reports
            entity::report::Model,
            models::ReportPayload,
            models::ReportListResponse,
            models::LatestDataResponse,
            models::LatestData,
            models::SuggestedValues,
            models::DefaultValues,
            // Dashboard
            models::DashboardStatsResponse,
            models::OverallStats,
            models::ProjectRollup,
            models::DashboardSummary,
            models::CachedOverall,
            models::CachedPortfolio,
            models::CachedProject,
            models::ProjectStatsResponse,
            models::ProjectOverall,
            models::TimeStats,
            // Lookups
            models::PortfolioPayload,
            models::PortfolioResponse,
            models::ProjectPayload,
            models::ProjectResponse,
            models::TesterPayload,
            models::TesterResponse,
            models::TesterProjectsPayload,
            models::TeamMemberPayload,
            models::TeamMemberResponse,
            models::FormDataResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Reports", description = "Test report CRUD and latest-data suggestions"),
        (name = "Dashboard", description = "Aggregated statistics and snapshots"),
        (name = "Lookups", description = "Portfolios, projects, testers, and team members")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds_and_registers_report_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components present");
        assert!(components.schemas.contains_key("Model"));
        assert!(components.schemas.contains_key("DashboardSummary"));

        let json = serde_json::to_string(&doc).expect("document serializes");
        assert!(json.contains("/api/reports"));
        assert!(json.contains("createdAt"));
    }
}
