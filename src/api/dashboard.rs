//! Dashboard and statistics API handlers.

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{DashboardStatsResponse, DashboardSummary, ProjectStatsResponse};
use crate::services::{project_stats, rollup, stats_cache};

/// Live dashboard rollup: global stats plus one entry per
/// (portfolio, project) group.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStatsResponse)
    )
)]
#[get("/dashboard/stats")]
pub async fn dashboard_stats(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let response = rollup::compute_dashboard(&pool).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Cached dashboard snapshot, falling back to live aggregation when the
/// cache is empty.
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary)
    )
)]
#[get("/dashboard/summary")]
pub async fn dashboard_summary(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let summary = stats_cache::summary(&pool).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Recompute the stats snapshot tables.
#[utoipa::path(
    post,
    path = "/api/dashboard/stats/refresh",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Snapshot refreshed", body = DashboardSummary)
    )
)]
#[post("/dashboard/stats/refresh")]
pub async fn refresh_dashboard_stats(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let summary = stats_cache::refresh(&pool).await?;
    info!("dashboard stats refresh requested");
    Ok(HttpResponse::Ok().json(summary))
}

/// All statistics for one project (lookup entity id).
#[utoipa::path(
    get,
    path = "/api/projects/{id}/stats",
    tag = "Dashboard",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project statistics", body = ProjectStatsResponse)
    )
)]
#[get("/projects/{id}/stats")]
pub async fn project_statistics(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let response = project_stats::project_stats(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard_stats)
        .service(dashboard_summary)
        .service(refresh_dashboard_stats)
        .service(project_statistics);
}
