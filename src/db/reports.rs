//! Database queries for reports.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, Condition, EntityTrait, FromQueryResult,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entity::report::{self, Column, Entity as Report};
use crate::error::{AppError, AppResult};
use crate::models::ReportListQuery;
use crate::services::versioning::VersionFields;

use super::DbPool;

#[derive(FromQueryResult)]
struct VersionRow {
    id: i32,
    sprint_number: i32,
    cycle_number: i32,
    release_number: Option<String>,
}

fn project_filter(portfolio_name: &str, project_name: &str) -> Condition {
    // Free-text group keys are matched case-insensitively.
    Condition::all()
        .add(Expr::cust_with_values(
            "LOWER(portfolio_name) = LOWER($1)",
            [portfolio_name.to_owned()],
        ))
        .add(Expr::cust_with_values(
            "LOWER(project_name) = LOWER($1)",
            [project_name.to_owned()],
        ))
}

impl DbPool {
    /// Insert a new report row from a fully computed model.
    pub async fn insert_report(&self, model: report::Model) -> AppResult<report::Model> {
        let mut active = model.into_active_model();
        active.id = NotSet;
        active.created_at = NotSet;
        active.updated_at = NotSet;

        let result = active
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert report: {}", e)))?;

        Ok(result)
    }

    /// Get a report by id.
    pub async fn get_report(&self, id: i32) -> AppResult<Option<report::Model>> {
        let result = Report::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report: {}", e)))?;

        Ok(result)
    }

    /// Persist an updated report row. The updated_at column is
    /// maintained by a database trigger.
    pub async fn update_report(&self, model: report::Model) -> AppResult<report::Model> {
        let mut active = model.into_active_model();
        active.created_at = NotSet;
        active.updated_at = NotSet;

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update report: {}", e)))?;

        Ok(result)
    }

    /// Delete a report by id. Returns false when no row matched.
    pub async fn delete_report(&self, id: i32) -> AppResult<bool> {
        let result = Report::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete report: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// List reports newest-first with pagination and optional search
    /// over portfolio, project, and report version.
    pub async fn list_reports(
        &self,
        query: &ReportListQuery,
    ) -> AppResult<(Vec<report::Model>, u64)> {
        let mut select = Report::find();

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "portfolio_name ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "project_name ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values("report_version ILIKE $1", [pattern])),
            );
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count reports: {}", e)))?;

        let per_page = query.per_page.clamp(1, 100);
        let page = query.page.max(1);

        let reports = select
            .order_by_desc(Column::Id)
            .offset((page - 1) * per_page)
            .limit(per_page)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list reports: {}", e)))?;

        Ok((reports, total))
    }

    /// All reports of one (portfolio, project) group, oldest first.
    pub async fn find_reports_by_project(
        &self,
        portfolio_name: &str,
        project_name: &str,
    ) -> AppResult<Vec<report::Model>> {
        let reports = Report::find()
            .filter(project_filter(portfolio_name, project_name))
            .order_by_asc(Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch project reports: {}", e)))?;

        Ok(reports)
    }

    /// All reports whose project name matches, regardless of portfolio.
    /// Matching is case-insensitive with surrounding whitespace ignored.
    pub async fn find_reports_by_project_name(
        &self,
        project_name: &str,
    ) -> AppResult<Vec<report::Model>> {
        let reports = Report::find()
            .filter(Expr::cust_with_values(
                "LOWER(TRIM(project_name)) = LOWER(TRIM($1))",
                [project_name.to_owned()],
            ))
            .order_by_asc(Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch project reports: {}", e)))?;

        Ok(reports)
    }

    /// Versioning fields of a project's full report history, as input
    /// to the suggestion heuristic.
    pub async fn version_history(
        &self,
        portfolio_name: &str,
        project_name: &str,
    ) -> AppResult<Vec<VersionFields>> {
        let rows = Report::find()
            .select_only()
            .column(Column::Id)
            .column(Column::SprintNumber)
            .column(Column::CycleNumber)
            .column(Column::ReleaseNumber)
            .filter(project_filter(portfolio_name, project_name))
            .order_by_asc(Column::Id)
            .into_model::<VersionRow>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch version history: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| VersionFields {
                id: row.id,
                sprint_number: row.sprint_number,
                cycle_number: row.cycle_number,
                release_number: row.release_number,
            })
            .collect())
    }
}
