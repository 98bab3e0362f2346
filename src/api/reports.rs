//! Report API handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use serde_json::{Value as JsonValue, json};
use tracing::info;

use crate::db::DbPool;
use crate::entity::tester;
use crate::error::{AppError, AppResult};
use crate::models::{
    DefaultValues, LatestData, LatestDataResponse, ReportListQuery, ReportListResponse,
    ReportPayload, SuggestedValues,
};
use crate::services::rollup::REPORT_DATE_FORMAT;
use crate::services::totals::calculate_totals;
use crate::services::versioning::{DEFAULT_RELEASE, reference_report, suggest_next_version};

/// List reports, newest first.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Paginated report list", body = ReportListResponse)
    )
)]
#[get("/reports")]
pub async fn list_reports(
    pool: web::Data<DbPool>,
    query: web::Query<ReportListQuery>,
) -> AppResult<HttpResponse> {
    let (reports, total) = pool.list_reports(&query).await?;

    let per_page = query.per_page.clamp(1, 100);
    let page = query.page.max(1);
    let total_pages = total.div_ceil(per_page);

    Ok(HttpResponse::Ok().json(ReportListResponse {
        reports,
        total,
        page,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }))
}

/// Create a report. Derived fields are computed server-side.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body = ReportPayload,
    responses(
        (status = 201, description = "Report created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[post("/reports")]
pub async fn create_report(
    pool: web::Data<DbPool>,
    payload: web::Json<ReportPayload>,
) -> AppResult<HttpResponse> {
    let mut model = crate::models::report::default_model();
    payload.apply(&mut model);

    if model.portfolio_name.trim().is_empty() || model.project_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "portfolioName and projectName are required".to_string(),
        ));
    }

    calculate_totals(&mut model);
    let created = pool.insert_report(model).await?;

    info!(
        report_id = created.id,
        portfolio = %created.portfolio_name,
        project = %created.project_name,
        "report created"
    );

    Ok(HttpResponse::Created().json(created))
}

/// Get one report by id.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report found"),
        (status = 404, description = "Report not found")
    )
)]
#[get("/reports/{id}")]
pub async fn get_report(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let report = pool
        .get_report(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

    Ok(HttpResponse::Ok().json(report))
}

/// Update a report. Absent fields keep their stored values; derived
/// fields are recomputed unconditionally.
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(("id" = i32, Path, description = "Report id")),
    request_body = ReportPayload,
    responses(
        (status = 200, description = "Report updated"),
        (status = 404, description = "Report not found")
    )
)]
#[put("/reports/{id}")]
pub async fn update_report(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    payload: web::Json<ReportPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut model = pool
        .get_report(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

    payload.apply(&mut model);
    calculate_totals(&mut model);

    let updated = pool.update_report(model).await?;
    info!(report_id = id, "report updated");

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a report.
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found")
    )
)]
#[delete("/reports/{id}")]
pub async fn delete_report(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_report(id).await? {
        return Err(AppError::NotFound(format!("Report {} not found", id)));
    }

    info!(report_id = id, "report deleted");
    Ok(HttpResponse::NoContent().finish())
}

fn assigned_tester_json(t: &tester::Model) -> JsonValue {
    json!({
        "id": t.id,
        "name": t.name,
        "email": t.email,
        "is_automation_engineer": t.is_automation_engineer,
        "is_manual_engineer": t.is_manual_engineer,
        "role_types": t.role_types(),
        "role_display": t.role_display(),
    })
}

/// Merge the project's assigned testers into the report's tester data,
/// skipping emails already present.
fn merge_assigned_testers(mut tester_data: JsonValue, assigned: &[tester::Model]) -> JsonValue {
    let entries = match tester_data.as_array_mut() {
        Some(entries) => entries,
        None => return tester_data,
    };

    let existing: Vec<String> = entries
        .iter()
        .filter_map(|e| e.get("email").and_then(JsonValue::as_str))
        .map(str::to_string)
        .collect();

    for t in assigned {
        if !existing.iter().any(|email| email == &t.email) {
            entries.push(assigned_tester_json(t));
        }
    }

    tester_data
}

/// Latest report data for a project, to auto-populate new reports.
///
/// Returns the most recent report's versioning fields plus heuristic
/// suggestions, or starting defaults when the project has no reports.
#[utoipa::path(
    get,
    path = "/api/projects/{portfolio}/{project}/latest-data",
    tag = "Reports",
    params(
        ("portfolio" = String, Path, description = "Portfolio name (case-insensitive)"),
        ("project" = String, Path, description = "Project name (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Latest project data", body = LatestDataResponse)
    )
)]
#[get("/projects/{portfolio}/{project}/latest-data")]
pub async fn latest_project_data(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (portfolio_name, project_name) = path.into_inner();

    let reports = pool
        .find_reports_by_project(&portfolio_name, &project_name)
        .await?;

    let assigned = match pool.find_project_by_name(&project_name).await? {
        Some(project) => pool.testers_for_project(project.id).await?,
        None => Vec::new(),
    };

    if reports.is_empty() {
        let tester_data = assigned
            .iter()
            .map(assigned_tester_json)
            .collect::<Vec<_>>();

        return Ok(HttpResponse::Ok().json(LatestDataResponse {
            has_data: false,
            latest_data: None,
            suggested_values: None,
            default_values: Some(DefaultValues {
                sprint_number: 1,
                cycle_number: 1,
                release_number: DEFAULT_RELEASE.to_string(),
                report_version: "1.0".to_string(),
                report_date: Utc::now().format(REPORT_DATE_FORMAT).to_string(),
                tester_data: JsonValue::Array(tester_data),
                team_members: json!([]),
            }),
        }));
    }

    let history = pool
        .version_history(&portfolio_name, &project_name)
        .await?;
    let suggestion = suggest_next_version(&history);

    // Version numbers come from the reference report (highest
    // sprint/cycle); everything else from the most recently created one.
    let latest = reports
        .last()
        .ok_or_else(|| AppError::Database("report history vanished".to_string()))?;
    let reference = reference_report(&history);

    let tester_data = merge_assigned_testers(latest.tester_data.clone(), &assigned);

    Ok(HttpResponse::Ok().json(LatestDataResponse {
        has_data: true,
        latest_data: Some(LatestData {
            sprint_number: reference.map_or(latest.sprint_number, |r| r.sprint_number),
            cycle_number: reference.map_or(latest.cycle_number, |r| r.cycle_number),
            release_number: reference
                .and_then(|r| r.release_number.clone())
                .unwrap_or_else(|| DEFAULT_RELEASE.to_string()),
            report_version: latest
                .report_version
                .clone()
                .unwrap_or_else(|| "1.0".to_string()),
            report_date: latest.report_date.clone(),
            tester_data,
            team_members: latest.team_member_data.clone(),
        }),
        suggested_values: Some(SuggestedValues {
            sprint_number: suggestion.sprint_number,
            cycle_number: suggestion.cycle_number,
            release_number: suggestion.release_number,
        }),
        default_values: None,
    }))
}

/// Configure report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_reports)
        .service(create_report)
        .service(get_report)
        .service(update_report)
        .service(delete_report)
        .service(latest_project_data);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tester(id: i32, email: &str) -> tester::Model {
        tester::Model {
            id,
            name: format!("Tester {}", id),
            email: email.to_string(),
            is_automation_engineer: false,
            is_manual_engineer: true,
            is_performance_tester: false,
            is_security_tester: false,
            is_api_tester: false,
            is_mobile_tester: false,
            is_web_tester: false,
            is_accessibility_tester: false,
            is_usability_tester: false,
            is_test_lead: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_assigned_testers_skips_existing_emails() {
        let existing = json!([{"name": "Sam", "email": "sam@example.com"}]);
        let assigned = [tester(1, "sam@example.com"), tester(2, "lee@example.com")];

        let merged = merge_assigned_testers(existing, &assigned);
        let entries = merged.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["email"], "lee@example.com");
    }

    #[test]
    fn test_merge_assigned_testers_leaves_non_array_data_alone() {
        let blob = json!({"unexpected": true});
        let merged = merge_assigned_testers(blob.clone(), &[tester(1, "sam@example.com")]);
        assert_eq!(merged, blob);
    }
}
