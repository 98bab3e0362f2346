//! Cached dashboard snapshot: refresh and read with live fallback.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CachedOverall, CachedPortfolio, CachedProject, DashboardStatsResponse, DashboardSummary,
    ProjectRollup,
};

use super::rollup::{self, REPORT_DATE_FORMAT};

/// Fold the project rollups into per-portfolio totals, ordered by
/// portfolio name. The portfolio's last report date is the newest
/// parseable date among its projects.
pub fn aggregate_portfolios(projects: &[ProjectRollup]) -> Vec<CachedPortfolio> {
    let mut by_name: BTreeMap<String, CachedPortfolio> = BTreeMap::new();

    for project in projects {
        let entry = by_name
            .entry(project.portfolio_name.clone())
            .or_insert_with(|| CachedPortfolio {
                portfolio_name: project.portfolio_name.clone(),
                total_projects: 0,
                total_reports: 0,
                total_user_stories: 0,
                total_test_cases: 0,
                total_issues: 0,
                total_enhancements: 0,
                last_report_date: None,
            });

        entry.total_projects += 1;
        entry.total_reports += project.total_reports;
        entry.total_user_stories += project.total_user_stories;
        entry.total_test_cases += project.total_test_cases;
        entry.total_issues += project.total_issues;
        entry.total_enhancements += project.total_enhancements;

        if let Some(date) = project.last_report_date.as_deref() {
            if is_newer(date, entry.last_report_date.as_deref()) {
                entry.last_report_date = Some(date.to_string());
            }
        }
    }

    by_name.into_values().collect()
}

fn is_newer(candidate: &str, current: Option<&str>) -> bool {
    let Ok(candidate) = NaiveDate::parse_from_str(candidate, REPORT_DATE_FORMAT) else {
        return false;
    };
    match current.and_then(|c| NaiveDate::parse_from_str(c, REPORT_DATE_FORMAT).ok()) {
        Some(current) => candidate > current,
        None => true,
    }
}

/// Recompute all three snapshot tables from the live rollup.
pub async fn refresh(pool: &DbPool) -> AppResult<DashboardSummary> {
    let dashboard = rollup::compute_dashboard(pool).await?;
    let portfolios = aggregate_portfolios(&dashboard.projects);
    pool.replace_stats_snapshot(&dashboard.overall, &portfolios, &dashboard.projects)
        .await?;
    tracing::info!(
        portfolios = portfolios.len(),
        projects = dashboard.projects.len(),
        total_reports = dashboard.overall.total_reports,
        "dashboard stats snapshot refreshed"
    );
    Ok(live_summary(&dashboard, portfolios))
}

/// Read the cached snapshot. Falls back to live aggregation when the
/// cache is empty or unreadable.
pub async fn summary(pool: &DbPool) -> AppResult<DashboardSummary> {
    match pool.read_stats_snapshot().await {
        Ok(Some((overall, portfolios, projects))) => Ok(DashboardSummary {
            overall: overall.into(),
            portfolios: portfolios.into_iter().map(CachedPortfolio::from).collect(),
            projects: projects.into_iter().map(CachedProject::from).collect(),
        }),
        Ok(None) => {
            tracing::info!("stats cache empty, serving live aggregation");
            let dashboard = rollup::compute_dashboard(pool).await?;
            let portfolios = aggregate_portfolios(&dashboard.projects);
            Ok(live_summary(&dashboard, portfolios))
        }
        Err(err) => {
            tracing::warn!(error = %err, "stats cache read failed, serving live aggregation");
            let dashboard = rollup::compute_dashboard(pool).await?;
            let portfolios = aggregate_portfolios(&dashboard.projects);
            Ok(live_summary(&dashboard, portfolios))
        }
    }
}

fn live_summary(
    dashboard: &DashboardStatsResponse,
    portfolios: Vec<CachedPortfolio>,
) -> DashboardSummary {
    let now = Utc::now();
    DashboardSummary {
        overall: CachedOverall {
            total_reports: dashboard.overall.total_reports,
            completed_reports: dashboard.overall.completed_reports,
            in_progress_reports: dashboard.overall.in_progress_reports,
            pending_reports: dashboard.overall.pending_reports,
            total_user_stories: dashboard.overall.total_user_stories,
            total_test_cases: dashboard.overall.total_test_cases,
            total_issues: dashboard.overall.total_issues,
            total_enhancements: dashboard.overall.total_enhancements,
            last_updated: now,
        },
        portfolios,
        projects: dashboard
            .projects
            .iter()
            .map(|p| CachedProject {
                portfolio_name: p.portfolio_name.clone(),
                project_name: p.project_name.clone(),
                total_reports: p.total_reports,
                total_user_stories: p.total_user_stories,
                total_test_cases: p.total_test_cases,
                total_issues: p.total_issues,
                total_enhancements: p.total_enhancements,
                last_report_date: p.last_report_date.clone(),
                latest_testing_status: Some(p.testing_status.clone()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(portfolio: &str, name: &str, reports: i64, date: Option<&str>) -> ProjectRollup {
        ProjectRollup {
            portfolio_name: portfolio.to_string(),
            project_name: name.to_string(),
            total_reports: reports,
            total_user_stories: reports * 10,
            total_issues: reports,
            last_report_date: date.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_portfolios_sums_per_portfolio() {
        let projects = [
            project("P1", "A", 2, None),
            project("P1", "B", 3, None),
            project("P2", "C", 1, None),
        ];

        let portfolios = aggregate_portfolios(&projects);
        assert_eq!(portfolios.len(), 2);
        assert_eq!(portfolios[0].portfolio_name, "P1");
        assert_eq!(portfolios[0].total_projects, 2);
        assert_eq!(portfolios[0].total_reports, 5);
        assert_eq!(portfolios[0].total_user_stories, 50);
        assert_eq!(portfolios[1].portfolio_name, "P2");
        assert_eq!(portfolios[1].total_projects, 1);
    }

    #[test]
    fn test_aggregate_portfolios_picks_newest_parsed_date() {
        // Lexicographic MAX would pick "20-01-2026"; 1 December is the
        // later calendar date.
        let projects = [
            project("P1", "A", 1, Some("01-12-2026")),
            project("P1", "B", 1, Some("20-01-2026")),
        ];

        let portfolios = aggregate_portfolios(&projects);
        assert_eq!(
            portfolios[0].last_report_date.as_deref(),
            Some("01-12-2026")
        );
    }

    #[test]
    fn test_aggregate_portfolios_ignores_malformed_dates() {
        let projects = [
            project("P1", "A", 1, Some("garbage")),
            project("P1", "B", 1, None),
        ];

        let portfolios = aggregate_portfolios(&projects);
        assert_eq!(portfolios[0].last_report_date, None);
    }

    #[test]
    fn test_aggregate_portfolios_empty_input() {
        assert!(aggregate_portfolios(&[]).is_empty());
    }
}
