//! Aggregation queries feeding the dashboard rollup engine.
//!
//! All summing happens in PostgreSQL; full report rows are never loaded
//! for the dashboard.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use crate::entity::report::{Column, Entity as Report};
use crate::error::{AppError, AppResult};
use crate::services::rollup::{
    GlobalSums, GroupSums, STATUS_COMPLETED, STATUS_IN_PROGRESS, StatusRow,
};

use super::DbPool;

/// Report counts bucketed by testing status.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCounts {
    pub total: i64,
    pub completed: i64,
    pub in_progress: i64,
}

macro_rules! sum_columns {
    ($select:expr, $($column:ident => $alias:literal),+ $(,)?) => {{
        let mut select = $select;
        $(
            select = select.column_as(Column::$column.sum(), $alias);
        )+
        select
    }};
}

/// Shared SUM projection over every counter category the dashboard
/// reports on.
fn with_counter_sums<S: QuerySelect>(select: S) -> S {
    sum_columns!(
        select,
        TotalUserStories => "total_user_stories",
        PassedUserStories => "passed_user_stories",
        PassedWithIssuesUserStories => "passed_with_issues_user_stories",
        FailedUserStories => "failed_user_stories",
        BlockedUserStories => "blocked_user_stories",
        CancelledUserStories => "cancelled_user_stories",
        DeferredUserStories => "deferred_user_stories",
        NotTestableUserStories => "not_testable_user_stories",
        TotalTestCases => "total_test_cases",
        PassedTestCases => "passed_test_cases",
        PassedWithIssuesTestCases => "passed_with_issues_test_cases",
        FailedTestCases => "failed_test_cases",
        BlockedTestCases => "blocked_test_cases",
        CancelledTestCases => "cancelled_test_cases",
        DeferredTestCases => "deferred_test_cases",
        NotTestableTestCases => "not_testable_test_cases",
        TotalIssues => "total_issues",
        CriticalIssues => "critical_issues",
        HighIssues => "high_issues",
        MediumIssues => "medium_issues",
        LowIssues => "low_issues",
        NewIssues => "new_issues",
        FixedIssues => "fixed_issues",
        NotFixedIssues => "not_fixed_issues",
        ReopenedIssues => "reopened_issues",
        DeferredIssues => "deferred_issues",
        TotalEnhancements => "total_enhancements",
        NewEnhancements => "new_enhancements",
        ImplementedEnhancements => "implemented_enhancements",
        ExistsEnhancements => "exists_enhancements",
        AutomationTotalTestCases => "automation_total_test_cases",
        AutomationPassedTestCases => "automation_passed_test_cases",
        AutomationFailedTestCases => "automation_failed_test_cases",
        AutomationSkippedTestCases => "automation_skipped_test_cases",
        AutomationStableTests => "automation_stable_tests",
        AutomationFlakyTests => "automation_flaky_tests",
    )
}

impl DbPool {
    /// Count reports per status bucket.
    pub async fn count_reports_by_status(&self) -> AppResult<StatusCounts> {
        let total = Report::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count reports: {}", e)))?;

        let completed = Report::find()
            .filter(Column::TestingStatus.eq(STATUS_COMPLETED))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count completed reports: {}", e)))?;

        let in_progress = Report::find()
            .filter(Column::TestingStatus.eq(STATUS_IN_PROGRESS))
            .count(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to count in-progress reports: {}", e))
            })?;

        Ok(StatusCounts {
            total: total as i64,
            completed: completed as i64,
            in_progress: in_progress as i64,
        })
    }

    /// Global counter sums across every report.
    pub async fn global_sums(&self) -> AppResult<GlobalSums> {
        let sums = with_counter_sums(Report::find().select_only())
            .into_model::<GlobalSums>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to aggregate reports: {}", e)))?;

        // SUM over zero rows yields one all-NULL row; either shape maps
        // to zeroed totals downstream.
        Ok(sums.unwrap_or_default())
    }

    /// Counter sums per (portfolio_name, project_name) group.
    pub async fn group_sums(&self) -> AppResult<Vec<GroupSums>> {
        let groups = with_counter_sums(
            Report::find()
                .select_only()
                .column(Column::PortfolioName)
                .column(Column::ProjectName)
                .column_as(Column::Id.count(), "total_reports"),
        )
        .group_by(Column::PortfolioName)
        .group_by(Column::ProjectName)
        .into_model::<GroupSums>()
        .all(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to aggregate project groups: {}", e)))?;

        Ok(groups)
    }

    /// Slim projection for latest-status resolution.
    pub async fn status_rows(&self) -> AppResult<Vec<StatusRow>> {
        let rows = Report::find()
            .select_only()
            .column(Column::Id)
            .column(Column::PortfolioName)
            .column(Column::ProjectName)
            .column(Column::TestingStatus)
            .column(Column::ReportDate)
            .into_model::<StatusRow>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch status rows: {}", e)))?;

        Ok(rows)
    }
}
