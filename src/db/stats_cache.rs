//! Cached dashboard snapshot queries.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set, TransactionTrait};

use crate::entity::{dashboard_stats, portfolio_stats, project_stats};
use crate::error::{AppError, AppResult};
use crate::models::{CachedPortfolio, OverallStats, ProjectRollup};

use super::DbPool;

impl DbPool {
    /// Replace the snapshot tables with a freshly computed rollup, in
    /// one transaction so readers see either the old or the new state.
    pub async fn replace_stats_snapshot(
        &self,
        overall: &OverallStats,
        portfolios: &[CachedPortfolio],
        projects: &[ProjectRollup],
    ) -> AppResult<()> {
        let now = Utc::now();

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        dashboard_stats::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear dashboard stats: {}", e)))?;
        portfolio_stats::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear portfolio stats: {}", e)))?;
        project_stats::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear project stats: {}", e)))?;

        dashboard_stats::ActiveModel {
            id: NotSet,
            total_reports: Set(overall.total_reports),
            completed_reports: Set(overall.completed_reports),
            in_progress_reports: Set(overall.in_progress_reports),
            pending_reports: Set(overall.pending_reports),
            total_user_stories: Set(overall.total_user_stories),
            total_test_cases: Set(overall.total_test_cases),
            total_issues: Set(overall.total_issues),
            total_enhancements: Set(overall.total_enhancements),
            last_updated: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert dashboard stats: {}", e)))?;

        for portfolio in portfolios {
            portfolio_stats::ActiveModel {
                id: NotSet,
                portfolio_name: Set(portfolio.portfolio_name.clone()),
                total_projects: Set(portfolio.total_projects),
                total_reports: Set(portfolio.total_reports),
                total_user_stories: Set(portfolio.total_user_stories),
                total_test_cases: Set(portfolio.total_test_cases),
                total_issues: Set(portfolio.total_issues),
                total_enhancements: Set(portfolio.total_enhancements),
                last_report_date: Set(portfolio.last_report_date.clone()),
                last_updated: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert portfolio stats: {}", e)))?;
        }

        for project in projects {
            project_stats::ActiveModel {
                id: NotSet,
                portfolio_name: Set(project.portfolio_name.clone()),
                project_name: Set(project.project_name.clone()),
                total_reports: Set(project.total_reports),
                total_user_stories: Set(project.total_user_stories),
                total_test_cases: Set(project.total_test_cases),
                total_issues: Set(project.total_issues),
                total_enhancements: Set(project.total_enhancements),
                last_report_date: Set(project.last_report_date.clone()),
                latest_testing_status: Set(Some(project.testing_status.clone())),
                last_updated: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project stats: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit stats snapshot: {}", e)))?;

        Ok(())
    }

    /// Read the cached snapshot. Returns None when no refresh has run
    /// yet; the caller falls back to live aggregation.
    pub async fn read_stats_snapshot(
        &self,
    ) -> AppResult<
        Option<(
            dashboard_stats::Model,
            Vec<portfolio_stats::Model>,
            Vec<project_stats::Model>,
        )>,
    > {
        let overall = dashboard_stats::Entity::find()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to read dashboard stats: {}", e)))?;

        let Some(overall) = overall else {
            return Ok(None);
        };

        let portfolios = portfolio_stats::Entity::find()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to read portfolio stats: {}", e)))?;

        let projects = project_stats::Entity::find()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to read project stats: {}", e)))?;

        Ok(Some((overall, portfolios, projects)))
    }
}
