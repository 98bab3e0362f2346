//! Database queries for the lookup entities.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entity::{portfolio, project, team_member, tester, tester_project};
use crate::error::{AppError, AppResult};
use crate::models::{PortfolioPayload, ProjectPayload, TeamMemberPayload, TesterPayload};

use super::DbPool;

impl DbPool {
    // ---- Portfolios ----

    /// All portfolios with their project counts.
    pub async fn list_portfolios(&self) -> AppResult<Vec<(portfolio::Model, i64)>> {
        let portfolios = portfolio::Entity::find()
            .order_by_asc(portfolio::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list portfolios: {}", e)))?;

        let projects = project::Entity::find()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        let mut counts: HashMap<i32, i64> = HashMap::new();
        for p in &projects {
            if let Some(portfolio_id) = p.portfolio_id {
                *counts.entry(portfolio_id).or_default() += 1;
            }
        }

        Ok(portfolios
            .into_iter()
            .map(|p| {
                let count = counts.get(&p.id).copied().unwrap_or(0);
                (p, count)
            })
            .collect())
    }

    pub async fn get_portfolio(&self, id: i32) -> AppResult<Option<portfolio::Model>> {
        portfolio::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get portfolio: {}", e)))
    }

    pub async fn create_portfolio(&self, payload: &PortfolioPayload) -> AppResult<portfolio::Model> {
        let existing = portfolio::Entity::find()
            .filter(portfolio::Column::Name.eq(&payload.name))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check portfolio name: {}", e)))?;
        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Portfolio '{}' already exists",
                payload.name
            )));
        }

        portfolio::ActiveModel {
            id: NotSet,
            name: Set(payload.name.clone()),
            description: Set(payload.description.clone()),
            created_at: NotSet,
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to create portfolio: {}", e)))
    }

    pub async fn update_portfolio(
        &self,
        id: i32,
        payload: &PortfolioPayload,
    ) -> AppResult<portfolio::Model> {
        let existing = self
            .get_portfolio(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Portfolio {} not found", id)))?;

        let name_taken = portfolio::Entity::find()
            .filter(portfolio::Column::Name.eq(&payload.name))
            .filter(portfolio::Column::Id.ne(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check portfolio name: {}", e)))?;
        if name_taken > 0 {
            return Err(AppError::Conflict(format!(
                "Portfolio '{}' already exists",
                payload.name
            )));
        }

        let mut active: portfolio::ActiveModel = existing.into();
        active.name = Set(payload.name.clone());
        active.description = Set(payload.description.clone());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update portfolio: {}", e)))
    }

    /// Delete a portfolio. Refused while projects still reference it.
    pub async fn delete_portfolio(&self, id: i32) -> AppResult<()> {
        self.get_portfolio(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Portfolio {} not found", id)))?;

        let project_count = project::Entity::find()
            .filter(project::Column::PortfolioId.eq(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count projects: {}", e)))?;
        if project_count > 0 {
            return Err(AppError::Conflict(format!(
                "Portfolio {} still has {} project(s)",
                id, project_count
            )));
        }

        portfolio::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete portfolio: {}", e)))?;

        Ok(())
    }

    pub async fn portfolio_projects(&self, portfolio_id: i32) -> AppResult<Vec<project::Model>> {
        project::Entity::find()
            .filter(project::Column::PortfolioId.eq(portfolio_id))
            .order_by_asc(project::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list portfolio projects: {}", e)))
    }

    // ---- Projects ----

    /// All projects with their portfolio names.
    pub async fn list_projects(&self) -> AppResult<Vec<(project::Model, Option<String>)>> {
        let rows = project::Entity::find()
            .find_also_related(portfolio::Entity)
            .order_by_asc(project::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(p, portfolio)| (p, portfolio.map(|pf| pf.name)))
            .collect())
    }

    pub async fn get_project(&self, id: i32) -> AppResult<Option<(project::Model, Option<String>)>> {
        let row = project::Entity::find_by_id(id)
            .find_also_related(portfolio::Entity)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?;

        Ok(row.map(|(p, portfolio)| (p, portfolio.map(|pf| pf.name))))
    }

    pub async fn create_project(&self, payload: &ProjectPayload) -> AppResult<project::Model> {
        if let Some(portfolio_id) = payload.portfolio_id {
            self.get_portfolio(portfolio_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Portfolio {} not found", portfolio_id)))?;
        }

        let existing = project::Entity::find()
            .filter(project::Column::Name.eq(&payload.name))
            .filter(match payload.portfolio_id {
                Some(portfolio_id) => project::Column::PortfolioId.eq(portfolio_id),
                None => project::Column::PortfolioId.is_null(),
            })
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check project name: {}", e)))?;
        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Project '{}' already exists in this portfolio",
                payload.name
            )));
        }

        project::ActiveModel {
            id: NotSet,
            name: Set(payload.name.clone()),
            description: Set(payload.description.clone()),
            portfolio_id: Set(payload.portfolio_id),
            created_at: NotSet,
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to create project: {}", e)))
    }

    pub async fn update_project(
        &self,
        id: i32,
        payload: &ProjectPayload,
    ) -> AppResult<project::Model> {
        let (existing, _) = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        if let Some(portfolio_id) = payload.portfolio_id {
            self.get_portfolio(portfolio_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Portfolio {} not found", portfolio_id)))?;
        }

        let mut active: project::ActiveModel = existing.into();
        active.name = Set(payload.name.clone());
        active.description = Set(payload.description.clone());
        active.portfolio_id = Set(payload.portfolio_id);

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update project: {}", e)))
    }

    pub async fn delete_project(&self, id: i32) -> AppResult<()> {
        let result = project::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete project: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Project {} not found", id)));
        }
        Ok(())
    }

    pub async fn projects_without_portfolio(&self) -> AppResult<Vec<project::Model>> {
        project::Entity::find()
            .filter(project::Column::PortfolioId.is_null())
            .order_by_asc(project::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list unassigned projects: {}", e)))
    }

    /// Case-insensitive project lookup by name, for the latest-data
    /// endpoint's tester merge.
    pub async fn find_project_by_name(&self, name: &str) -> AppResult<Option<project::Model>> {
        use sea_orm::sea_query::Expr;

        project::Entity::find()
            .filter(Expr::cust_with_values(
                "LOWER(name) = LOWER($1)",
                [name.to_owned()],
            ))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find project by name: {}", e)))
    }

    // ---- Testers ----

    /// All testers with their assigned project ids.
    pub async fn list_testers(&self) -> AppResult<Vec<(tester::Model, Vec<i32>)>> {
        let testers = tester::Entity::find()
            .order_by_asc(tester::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list testers: {}", e)))?;

        let assignments = tester_project::Entity::find()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list tester projects: {}", e)))?;

        let mut by_tester: HashMap<i32, Vec<i32>> = HashMap::new();
        for a in assignments {
            by_tester.entry(a.tester_id).or_default().push(a.project_id);
        }

        Ok(testers
            .into_iter()
            .map(|t| {
                let project_ids = by_tester.remove(&t.id).unwrap_or_default();
                (t, project_ids)
            })
            .collect())
    }

    pub async fn get_tester(&self, id: i32) -> AppResult<Option<(tester::Model, Vec<i32>)>> {
        let Some(tester) = tester::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get tester: {}", e)))?
        else {
            return Ok(None);
        };

        let project_ids = tester_project::Entity::find()
            .filter(tester_project::Column::TesterId.eq(id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get tester projects: {}", e)))?
            .into_iter()
            .map(|a| a.project_id)
            .collect();

        Ok(Some((tester, project_ids)))
    }

    pub async fn create_tester(&self, payload: &TesterPayload) -> AppResult<tester::Model> {
        let existing = tester::Entity::find()
            .filter(tester::Column::Email.eq(&payload.email))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check tester email: {}", e)))?;
        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Tester with email '{}' already exists",
                payload.email
            )));
        }

        tester::ActiveModel {
            id: NotSet,
            name: Set(payload.name.clone()),
            email: Set(payload.email.clone()),
            is_automation_engineer: Set(payload.is_automation_engineer),
            is_manual_engineer: Set(payload.is_manual_engineer),
            is_performance_tester: Set(payload.is_performance_tester),
            is_security_tester: Set(payload.is_security_tester),
            is_api_tester: Set(payload.is_api_tester),
            is_mobile_tester: Set(payload.is_mobile_tester),
            is_web_tester: Set(payload.is_web_tester),
            is_accessibility_tester: Set(payload.is_accessibility_tester),
            is_usability_tester: Set(payload.is_usability_tester),
            is_test_lead: Set(payload.is_test_lead),
            created_at: NotSet,
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to create tester: {}", e)))
    }

    pub async fn update_tester(&self, id: i32, payload: &TesterPayload) -> AppResult<tester::Model> {
        let Some((existing, _)) = self.get_tester(id).await? else {
            return Err(AppError::NotFound(format!("Tester {} not found", id)));
        };

        let email_taken = tester::Entity::find()
            .filter(tester::Column::Email.eq(&payload.email))
            .filter(tester::Column::Id.ne(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check tester email: {}", e)))?;
        if email_taken > 0 {
            return Err(AppError::Conflict(format!(
                "Tester with email '{}' already exists",
                payload.email
            )));
        }

        let mut active: tester::ActiveModel = existing.into();
        active.name = Set(payload.name.clone());
        active.email = Set(payload.email.clone());
        active.is_automation_engineer = Set(payload.is_automation_engineer);
        active.is_manual_engineer = Set(payload.is_manual_engineer);
        active.is_performance_tester = Set(payload.is_performance_tester);
        active.is_security_tester = Set(payload.is_security_tester);
        active.is_api_tester = Set(payload.is_api_tester);
        active.is_mobile_tester = Set(payload.is_mobile_tester);
        active.is_web_tester = Set(payload.is_web_tester);
        active.is_accessibility_tester = Set(payload.is_accessibility_tester);
        active.is_usability_tester = Set(payload.is_usability_tester);
        active.is_test_lead = Set(payload.is_test_lead);

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update tester: {}", e)))
    }

    pub async fn delete_tester(&self, id: i32) -> AppResult<()> {
        let result = tester::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete tester: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Tester {} not found", id)));
        }
        Ok(())
    }

    /// Replace a tester's project assignments.
    pub async fn set_tester_projects(&self, tester_id: i32, project_ids: &[i32]) -> AppResult<()> {
        self.get_tester(tester_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tester {} not found", tester_id)))?;

        let known = project::Entity::find()
            .filter(project::Column::Id.is_in(project_ids.to_vec()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to validate project ids: {}", e)))?;
        if known as usize != project_ids.len() {
            return Err(AppError::InvalidInput(
                "One or more project ids do not exist".to_string(),
            ));
        }

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        tester_project::Entity::delete_many()
            .filter(tester_project::Column::TesterId.eq(tester_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear tester projects: {}", e)))?;

        for &project_id in project_ids {
            tester_project::ActiveModel {
                tester_id: Set(tester_id),
                project_id: Set(project_id),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to assign tester project: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit tester projects: {}", e)))?;

        Ok(())
    }

    /// Testers assigned to one project.
    pub async fn testers_for_project(&self, project_id: i32) -> AppResult<Vec<tester::Model>> {
        let assignments = tester_project::Entity::find()
            .filter(tester_project::Column::ProjectId.eq(project_id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list project testers: {}", e)))?;

        let tester_ids: Vec<i32> = assignments.into_iter().map(|a| a.tester_id).collect();
        if tester_ids.is_empty() {
            return Ok(Vec::new());
        }

        tester::Entity::find()
            .filter(tester::Column::Id.is_in(tester_ids))
            .order_by_asc(tester::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load project testers: {}", e)))
    }

    // ---- Team members ----

    pub async fn list_team_members(&self) -> AppResult<Vec<team_member::Model>> {
        team_member::Entity::find()
            .order_by_asc(team_member::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list team members: {}", e)))
    }

    pub async fn get_team_member(&self, id: i32) -> AppResult<Option<team_member::Model>> {
        team_member::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get team member: {}", e)))
    }

    pub async fn create_team_member(
        &self,
        payload: &TeamMemberPayload,
    ) -> AppResult<team_member::Model> {
        let existing = team_member::Entity::find()
            .filter(team_member::Column::Email.eq(&payload.email))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check member email: {}", e)))?;
        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "Team member with email '{}' already exists",
                payload.email
            )));
        }

        team_member::ActiveModel {
            id: NotSet,
            name: Set(payload.name.clone()),
            email: Set(payload.email.clone()),
            role: Set(payload.role.clone()),
            created_at: NotSet,
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to create team member: {}", e)))
    }

    pub async fn update_team_member(
        &self,
        id: i32,
        payload: &TeamMemberPayload,
    ) -> AppResult<team_member::Model> {
        let existing = self
            .get_team_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team member {} not found", id)))?;

        let email_taken = team_member::Entity::find()
            .filter(team_member::Column::Email.eq(&payload.email))
            .filter(team_member::Column::Id.ne(id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check member email: {}", e)))?;
        if email_taken > 0 {
            return Err(AppError::Conflict(format!(
                "Team member with email '{}' already exists",
                payload.email
            )));
        }

        let mut active: team_member::ActiveModel = existing.into();
        active.name = Set(payload.name.clone());
        active.email = Set(payload.email.clone());
        active.role = Set(payload.role.clone());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update team member: {}", e)))
    }

    pub async fn delete_team_member(&self, id: i32) -> AppResult<()> {
        let result = team_member::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete team member: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Team member {} not found", id)));
        }
        Ok(())
    }
}
