//! Request/response models shared between the API layer and the database.

pub mod dashboard;
pub mod latest_data;
pub mod lookups;
pub mod report;

pub use dashboard::{
    CachedOverall, CachedPortfolio, CachedProject, DashboardStatsResponse, DashboardSummary,
    OverallStats, ProjectOverall, ProjectRollup, ProjectStatsResponse, TimeStats,
};
pub use latest_data::{DefaultValues, LatestData, LatestDataResponse, SuggestedValues};
pub use lookups::{
    FormDataResponse, PortfolioPayload, PortfolioResponse, ProjectPayload, ProjectResponse,
    TeamMemberPayload, TeamMemberResponse, TesterPayload, TesterProjectsPayload, TesterResponse,
    VALID_TEAM_ROLES,
};
pub use report::{ReportListQuery, ReportListResponse, ReportPayload};
