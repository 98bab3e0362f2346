//! Lookup entity API handlers: portfolios, projects, testers, and team
//! members, plus the combined form-data payload.

use actix_web::{HttpResponse, delete, get, post, put, web};
use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    FormDataResponse, PortfolioPayload, PortfolioResponse, ProjectPayload, ProjectResponse,
    TeamMemberPayload, TeamMemberResponse, TesterPayload, TesterProjectsPayload, TesterResponse,
    VALID_TEAM_ROLES,
};

fn require_name(name: &str, what: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} name is required", what)));
    }
    Ok(())
}

fn validate_team_role(role: &str) -> AppResult<()> {
    if !VALID_TEAM_ROLES.contains(&role) {
        return Err(AppError::InvalidInput(format!("Invalid role: {}", role)));
    }
    Ok(())
}

// ---- Portfolios ----

#[utoipa::path(
    get,
    path = "/api/portfolios",
    tag = "Lookups",
    responses((status = 200, description = "All portfolios", body = [PortfolioResponse]))
)]
#[get("/portfolios")]
pub async fn list_portfolios(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let portfolios: Vec<PortfolioResponse> = pool
        .list_portfolios()
        .await?
        .into_iter()
        .map(|(model, count)| PortfolioResponse::from_model(model, count))
        .collect();

    Ok(HttpResponse::Ok().json(portfolios))
}

#[utoipa::path(
    post,
    path = "/api/portfolios",
    tag = "Lookups",
    request_body = PortfolioPayload,
    responses(
        (status = 201, description = "Portfolio created", body = PortfolioResponse),
        (status = 409, description = "Name already taken")
    )
)]
#[post("/portfolios")]
pub async fn create_portfolio(
    pool: web::Data<DbPool>,
    payload: web::Json<PortfolioPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Portfolio")?;
    let created = pool.create_portfolio(&payload).await?;
    info!(portfolio_id = created.id, name = %created.name, "portfolio created");
    Ok(HttpResponse::Created().json(PortfolioResponse::from_model(created, 0)))
}

#[utoipa::path(
    get,
    path = "/api/portfolios/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Portfolio id")),
    responses(
        (status = 200, description = "Portfolio found", body = PortfolioResponse),
        (status = 404, description = "Portfolio not found")
    )
)]
#[get("/portfolios/{id}")]
pub async fn get_portfolio(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let portfolio = pool
        .get_portfolio(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {} not found", id)))?;
    let project_count = pool.portfolio_projects(id).await?.len() as i64;

    Ok(HttpResponse::Ok().json(PortfolioResponse::from_model(portfolio, project_count)))
}

#[utoipa::path(
    put,
    path = "/api/portfolios/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Portfolio id")),
    request_body = PortfolioPayload,
    responses(
        (status = 200, description = "Portfolio updated", body = PortfolioResponse),
        (status = 404, description = "Portfolio not found")
    )
)]
#[put("/portfolios/{id}")]
pub async fn update_portfolio(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<PortfolioPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Portfolio")?;
    let id = path.into_inner();
    let updated = pool.update_portfolio(id, &payload).await?;
    let project_count = pool.portfolio_projects(id).await?.len() as i64;

    Ok(HttpResponse::Ok().json(PortfolioResponse::from_model(updated, project_count)))
}

#[utoipa::path(
    delete,
    path = "/api/portfolios/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Portfolio id")),
    responses(
        (status = 204, description = "Portfolio deleted"),
        (status = 404, description = "Portfolio not found"),
        (status = 409, description = "Portfolio still has projects")
    )
)]
#[delete("/portfolios/{id}")]
pub async fn delete_portfolio(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_portfolio(id).await?;
    info!(portfolio_id = id, "portfolio deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/portfolios/{id}/projects",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Portfolio id")),
    responses((status = 200, description = "Portfolio projects", body = [ProjectResponse]))
)]
#[get("/portfolios/{id}/projects")]
pub async fn portfolio_projects(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let portfolio = pool
        .get_portfolio(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {} not found", id)))?;

    let projects: Vec<ProjectResponse> = pool
        .portfolio_projects(id)
        .await?
        .into_iter()
        .map(|p| ProjectResponse::from_model(p, Some(portfolio.name.clone())))
        .collect();

    Ok(HttpResponse::Ok().json(projects))
}

// ---- Projects ----

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Lookups",
    responses((status = 200, description = "All projects", body = [ProjectResponse]))
)]
#[get("/projects")]
pub async fn list_projects(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let projects: Vec<ProjectResponse> = pool
        .list_projects()
        .await?
        .into_iter()
        .map(|(model, portfolio_name)| ProjectResponse::from_model(model, portfolio_name))
        .collect();

    Ok(HttpResponse::Ok().json(projects))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Lookups",
    request_body = ProjectPayload,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 409, description = "Name already taken in portfolio")
    )
)]
#[post("/projects")]
pub async fn create_project(
    pool: web::Data<DbPool>,
    payload: web::Json<ProjectPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Project")?;
    let created = pool.create_project(&payload).await?;
    info!(project_id = created.id, name = %created.name, "project created");

    let portfolio_name = match created.portfolio_id {
        Some(portfolio_id) => pool.get_portfolio(portfolio_id).await?.map(|p| p.name),
        None => None,
    };

    Ok(HttpResponse::Created().json(ProjectResponse::from_model(created, portfolio_name)))
}

#[utoipa::path(
    get,
    path = "/api/projects/without-portfolio",
    tag = "Lookups",
    responses((status = 200, description = "Projects without a portfolio", body = [ProjectResponse]))
)]
#[get("/projects/without-portfolio")]
pub async fn projects_without_portfolio(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let projects: Vec<ProjectResponse> = pool
        .projects_without_portfolio()
        .await?
        .into_iter()
        .map(|p| ProjectResponse::from_model(p, None))
        .collect();

    Ok(HttpResponse::Ok().json(projects))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = ProjectResponse),
        (status = 404, description = "Project not found")
    )
)]
#[get("/projects/{id}")]
pub async fn get_project(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (project, portfolio_name) = pool
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

    Ok(HttpResponse::Ok().json(ProjectResponse::from_model(project, portfolio_name)))
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Project id")),
    request_body = ProjectPayload,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 404, description = "Project not found")
    )
)]
#[put("/projects/{id}")]
pub async fn update_project(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<ProjectPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Project")?;
    let updated = pool.update_project(path.into_inner(), &payload).await?;

    let portfolio_name = match updated.portfolio_id {
        Some(portfolio_id) => pool.get_portfolio(portfolio_id).await?.map(|p| p.name),
        None => None,
    };

    Ok(HttpResponse::Ok().json(ProjectResponse::from_model(updated, portfolio_name)))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found")
    )
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_project(id).await?;
    info!(project_id = id, "project deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/testers",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Project id")),
    responses((status = 200, description = "Testers assigned to the project", body = [TesterResponse]))
)]
#[get("/projects/{id}/testers")]
pub async fn project_testers(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

    let testers: Vec<TesterResponse> = pool
        .testers_for_project(id)
        .await?
        .into_iter()
        .map(|t| TesterResponse::from_model(t, vec![id]))
        .collect();

    Ok(HttpResponse::Ok().json(testers))
}

// ---- Testers ----

#[utoipa::path(
    get,
    path = "/api/testers",
    tag = "Lookups",
    responses((status = 200, description = "All testers", body = [TesterResponse]))
)]
#[get("/testers")]
pub async fn list_testers(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let testers: Vec<TesterResponse> = pool
        .list_testers()
        .await?
        .into_iter()
        .map(|(model, project_ids)| TesterResponse::from_model(model, project_ids))
        .collect();

    Ok(HttpResponse::Ok().json(testers))
}

#[utoipa::path(
    post,
    path = "/api/testers",
    tag = "Lookups",
    request_body = TesterPayload,
    responses(
        (status = 201, description = "Tester created", body = TesterResponse),
        (status = 409, description = "Email already taken")
    )
)]
#[post("/testers")]
pub async fn create_tester(
    pool: web::Data<DbPool>,
    payload: web::Json<TesterPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Tester")?;
    if payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Tester email is required".to_string()));
    }

    let created = pool.create_tester(&payload).await?;
    info!(tester_id = created.id, email = %created.email, "tester created");
    Ok(HttpResponse::Created().json(TesterResponse::from_model(created, Vec::new())))
}

#[utoipa::path(
    get,
    path = "/api/testers/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Tester id")),
    responses(
        (status = 200, description = "Tester found", body = TesterResponse),
        (status = 404, description = "Tester not found")
    )
)]
#[get("/testers/{id}")]
pub async fn get_tester(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (tester, project_ids) = pool
        .get_tester(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tester {} not found", id)))?;

    Ok(HttpResponse::Ok().json(TesterResponse::from_model(tester, project_ids)))
}

#[utoipa::path(
    put,
    path = "/api/testers/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Tester id")),
    request_body = TesterPayload,
    responses(
        (status = 200, description = "Tester updated", body = TesterResponse),
        (status = 404, description = "Tester not found")
    )
)]
#[put("/testers/{id}")]
pub async fn update_tester(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<TesterPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Tester")?;
    let id = path.into_inner();
    let updated = pool.update_tester(id, &payload).await?;
    let project_ids = pool
        .get_tester(id)
        .await?
        .map(|(_, ids)| ids)
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(TesterResponse::from_model(updated, project_ids)))
}

#[utoipa::path(
    delete,
    path = "/api/testers/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Tester id")),
    responses(
        (status = 204, description = "Tester deleted"),
        (status = 404, description = "Tester not found")
    )
)]
#[delete("/testers/{id}")]
pub async fn delete_tester(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_tester(id).await?;
    info!(tester_id = id, "tester deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    put,
    path = "/api/testers/{id}/projects",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Tester id")),
    request_body = TesterProjectsPayload,
    responses(
        (status = 200, description = "Assignments replaced", body = TesterResponse),
        (status = 404, description = "Tester not found")
    )
)]
#[put("/testers/{id}/projects")]
pub async fn set_tester_projects(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<TesterProjectsPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.set_tester_projects(id, &payload.project_ids).await?;

    let (tester, project_ids) = pool
        .get_tester(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tester {} not found", id)))?;

    info!(tester_id = id, projects = project_ids.len(), "tester projects replaced");
    Ok(HttpResponse::Ok().json(TesterResponse::from_model(tester, project_ids)))
}

// ---- Team members ----

#[utoipa::path(
    get,
    path = "/api/team-members",
    tag = "Lookups",
    responses((status = 200, description = "All team members", body = [TeamMemberResponse]))
)]
#[get("/team-members")]
pub async fn list_team_members(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let members: Vec<TeamMemberResponse> = pool
        .list_team_members()
        .await?
        .into_iter()
        .map(TeamMemberResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(members))
}

#[utoipa::path(
    post,
    path = "/api/team-members",
    tag = "Lookups",
    request_body = TeamMemberPayload,
    responses(
        (status = 201, description = "Team member created", body = TeamMemberResponse),
        (status = 400, description = "Invalid role"),
        (status = 409, description = "Email already taken")
    )
)]
#[post("/team-members")]
pub async fn create_team_member(
    pool: web::Data<DbPool>,
    payload: web::Json<TeamMemberPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Team member")?;
    validate_team_role(&payload.role)?;

    let created = pool.create_team_member(&payload).await?;
    info!(member_id = created.id, email = %created.email, "team member created");
    Ok(HttpResponse::Created().json(TeamMemberResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/team-members/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Team member id")),
    responses(
        (status = 200, description = "Team member found", body = TeamMemberResponse),
        (status = 404, description = "Team member not found")
    )
)]
#[get("/team-members/{id}")]
pub async fn get_team_member(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let member = pool
        .get_team_member(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team member {} not found", id)))?;

    Ok(HttpResponse::Ok().json(TeamMemberResponse::from(member)))
}

#[utoipa::path(
    put,
    path = "/api/team-members/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Team member id")),
    request_body = TeamMemberPayload,
    responses(
        (status = 200, description = "Team member updated", body = TeamMemberResponse),
        (status = 404, description = "Team member not found")
    )
)]
#[put("/team-members/{id}")]
pub async fn update_team_member(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<TeamMemberPayload>,
) -> AppResult<HttpResponse> {
    require_name(&payload.name, "Team member")?;
    validate_team_role(&payload.role)?;

    let updated = pool.update_team_member(path.into_inner(), &payload).await?;
    Ok(HttpResponse::Ok().json(TeamMemberResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/team-members/{id}",
    tag = "Lookups",
    params(("id" = i32, Path, description = "Team member id")),
    responses(
        (status = 204, description = "Team member deleted"),
        (status = 404, description = "Team member not found")
    )
)]
#[delete("/team-members/{id}")]
pub async fn delete_team_member(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_team_member(id).await?;
    info!(member_id = id, "team member deleted");
    Ok(HttpResponse::NoContent().finish())
}

// ---- Form data ----

/// Every lookup in one payload, for the report form's dropdowns.
#[utoipa::path(
    get,
    path = "/api/form-data",
    tag = "Lookups",
    responses((status = 200, description = "Lookup data for forms", body = FormDataResponse))
)]
#[get("/form-data")]
pub async fn form_data(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let portfolios = pool
        .list_portfolios()
        .await?
        .into_iter()
        .map(|(model, count)| PortfolioResponse::from_model(model, count))
        .collect();
    let projects = pool
        .list_projects()
        .await?
        .into_iter()
        .map(|(model, portfolio_name)| ProjectResponse::from_model(model, portfolio_name))
        .collect();
    let testers = pool
        .list_testers()
        .await?
        .into_iter()
        .map(|(model, project_ids)| TesterResponse::from_model(model, project_ids))
        .collect();
    let team_members = pool
        .list_team_members()
        .await?
        .into_iter()
        .map(TeamMemberResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(FormDataResponse {
        portfolios,
        projects,
        testers,
        team_members,
        valid_roles: VALID_TEAM_ROLES.to_vec(),
    }))
}

/// Configure lookup routes. Literal project paths are registered before
/// the parameterized ones so they are not captured as ids.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_portfolios)
        .service(create_portfolio)
        .service(get_portfolio)
        .service(update_portfolio)
        .service(delete_portfolio)
        .service(portfolio_projects)
        .service(list_projects)
        .service(create_project)
        .service(projects_without_portfolio)
        .service(get_project)
        .service(update_project)
        .service(delete_project)
        .service(project_testers)
        .service(list_testers)
        .service(create_tester)
        .service(get_tester)
        .service(update_tester)
        .service(delete_tester)
        .service(set_tester_projects)
        .service(list_team_members)
        .service(create_team_member)
        .service(get_team_member)
        .service(update_team_member)
        .service(delete_team_member)
        .service(form_data);
}
