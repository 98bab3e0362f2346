//! Dashboard rollup engine.
//!
//! Aggregation is pushed down to PostgreSQL (SUM + GROUP BY); this
//! module holds the row shapes those queries project into and the pure
//! logic layered on top: rate computation, risk level, and latest-status
//! resolution from free-text DD-MM-YYYY report dates.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::FromQueryResult;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{DashboardStatsResponse, OverallStats, ProjectRollup};

pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Statuses that bucket as completed / in progress; everything else
/// counts as pending.
pub const STATUS_COMPLETED: &str = "passed";
pub const STATUS_IN_PROGRESS: &str = "passed-with-issues";

/// Global SUM projection over every report.
#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct GlobalSums {
    pub total_user_stories: Option<i64>,
    pub passed_user_stories: Option<i64>,
    pub passed_with_issues_user_stories: Option<i64>,
    pub failed_user_stories: Option<i64>,
    pub blocked_user_stories: Option<i64>,
    pub cancelled_user_stories: Option<i64>,
    pub deferred_user_stories: Option<i64>,
    pub not_testable_user_stories: Option<i64>,
    pub total_test_cases: Option<i64>,
    pub passed_test_cases: Option<i64>,
    pub passed_with_issues_test_cases: Option<i64>,
    pub failed_test_cases: Option<i64>,
    pub blocked_test_cases: Option<i64>,
    pub cancelled_test_cases: Option<i64>,
    pub deferred_test_cases: Option<i64>,
    pub not_testable_test_cases: Option<i64>,
    pub total_issues: Option<i64>,
    pub critical_issues: Option<i64>,
    pub high_issues: Option<i64>,
    pub medium_issues: Option<i64>,
    pub low_issues: Option<i64>,
    pub new_issues: Option<i64>,
    pub fixed_issues: Option<i64>,
    pub not_fixed_issues: Option<i64>,
    pub reopened_issues: Option<i64>,
    pub deferred_issues: Option<i64>,
    pub total_enhancements: Option<i64>,
    pub new_enhancements: Option<i64>,
    pub implemented_enhancements: Option<i64>,
    pub exists_enhancements: Option<i64>,
    pub automation_total_test_cases: Option<i64>,
    pub automation_passed_test_cases: Option<i64>,
    pub automation_failed_test_cases: Option<i64>,
    pub automation_skipped_test_cases: Option<i64>,
    pub automation_stable_tests: Option<i64>,
    pub automation_flaky_tests: Option<i64>,
}

/// Per-(portfolio, project) SUM projection.
#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct GroupSums {
    pub portfolio_name: String,
    pub project_name: String,
    pub total_reports: i64,
    pub total_user_stories: Option<i64>,
    pub passed_user_stories: Option<i64>,
    pub passed_with_issues_user_stories: Option<i64>,
    pub failed_user_stories: Option<i64>,
    pub blocked_user_stories: Option<i64>,
    pub cancelled_user_stories: Option<i64>,
    pub deferred_user_stories: Option<i64>,
    pub not_testable_user_stories: Option<i64>,
    pub total_test_cases: Option<i64>,
    pub passed_test_cases: Option<i64>,
    pub passed_with_issues_test_cases: Option<i64>,
    pub failed_test_cases: Option<i64>,
    pub blocked_test_cases: Option<i64>,
    pub cancelled_test_cases: Option<i64>,
    pub deferred_test_cases: Option<i64>,
    pub not_testable_test_cases: Option<i64>,
    pub total_issues: Option<i64>,
    pub critical_issues: Option<i64>,
    pub high_issues: Option<i64>,
    pub medium_issues: Option<i64>,
    pub low_issues: Option<i64>,
    pub new_issues: Option<i64>,
    pub fixed_issues: Option<i64>,
    pub not_fixed_issues: Option<i64>,
    pub reopened_issues: Option<i64>,
    pub deferred_issues: Option<i64>,
    pub total_enhancements: Option<i64>,
    pub new_enhancements: Option<i64>,
    pub implemented_enhancements: Option<i64>,
    pub exists_enhancements: Option<i64>,
    pub automation_total_test_cases: Option<i64>,
    pub automation_passed_test_cases: Option<i64>,
    pub automation_failed_test_cases: Option<i64>,
    pub automation_skipped_test_cases: Option<i64>,
    pub automation_stable_tests: Option<i64>,
    pub automation_flaky_tests: Option<i64>,
}

/// Slim projection used to resolve each group's latest report.
#[derive(Debug, Clone, FromQueryResult)]
pub struct StatusRow {
    pub id: i32,
    pub portfolio_name: String,
    pub project_name: String,
    pub testing_status: String,
    pub report_date: Option<String>,
}

/// Latest testing status and report date of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLatest {
    pub testing_status: String,
    pub last_report_date: Option<String>,
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Success rate in percent, rounded to 1 decimal, 0.0 on empty total.
pub fn success_rate(successful: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round1(successful as f64 / total as f64 * 100.0)
}

/// Risk classification from summed issue priorities.
pub fn risk_level(critical_issues: i64, high_issues: i64) -> &'static str {
    if critical_issues > 0 {
        "High"
    } else if high_issues > 0 {
        "Medium"
    } else {
        "Low"
    }
}

/// Resolve each group's latest report from slim status rows.
///
/// Ordering is by parsed DD-MM-YYYY date, ties broken by highest id.
/// Rows with unparseable dates are skipped from date ordering with a
/// warning; a group whose dates are all unparseable falls back to the
/// highest id and reports no last date.
pub fn resolve_latest(rows: &[StatusRow]) -> HashMap<(String, String), GroupLatest> {
    struct Candidate<'a> {
        dated: Option<(NaiveDate, i32, &'a StatusRow)>,
        undated: Option<(i32, &'a StatusRow)>,
    }

    let mut candidates: HashMap<(String, String), Candidate<'_>> = HashMap::new();

    for row in rows {
        let key = (row.portfolio_name.clone(), row.project_name.clone());
        let entry = candidates.entry(key).or_insert(Candidate {
            dated: None,
            undated: None,
        });

        let parsed = row.report_date.as_deref().and_then(|text| {
            match NaiveDate::parse_from_str(text, REPORT_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    tracing::warn!(
                        report_id = row.id,
                        report_date = text,
                        "skipping unparseable report date in rollup"
                    );
                    None
                }
            }
        });

        match parsed {
            Some(date) => {
                if entry
                    .dated
                    .map_or(true, |(best_date, best_id, _)| (date, row.id) > (best_date, best_id))
                {
                    entry.dated = Some((date, row.id, row));
                }
            }
            None => {
                if entry.undated.map_or(true, |(best_id, _)| row.id > best_id) {
                    entry.undated = Some((row.id, row));
                }
            }
        }
    }

    candidates
        .into_iter()
        .map(|(key, candidate)| {
            let latest = match (candidate.dated, candidate.undated) {
                (Some((_, _, row)), _) => GroupLatest {
                    testing_status: row.testing_status.clone(),
                    last_report_date: row.report_date.clone(),
                },
                (None, Some((_, row))) => GroupLatest {
                    testing_status: row.testing_status.clone(),
                    last_report_date: None,
                },
                (None, None) => unreachable!("group without rows"),
            };
            (key, latest)
        })
        .collect()
}

/// Assemble the global stats block from status counts and summed totals.
pub fn build_overall(
    total_reports: i64,
    completed_reports: i64,
    in_progress_reports: i64,
    sums: &GlobalSums,
) -> OverallStats {
    OverallStats {
        total_reports,
        completed_reports,
        in_progress_reports,
        pending_reports: total_reports - completed_reports - in_progress_reports,
        total_user_stories: sums.total_user_stories.unwrap_or(0),
        passed_user_stories: sums.passed_user_stories.unwrap_or(0),
        passed_with_issues_user_stories: sums.passed_with_issues_user_stories.unwrap_or(0),
        failed_user_stories: sums.failed_user_stories.unwrap_or(0),
        blocked_user_stories: sums.blocked_user_stories.unwrap_or(0),
        cancelled_user_stories: sums.cancelled_user_stories.unwrap_or(0),
        deferred_user_stories: sums.deferred_user_stories.unwrap_or(0),
        not_testable_user_stories: sums.not_testable_user_stories.unwrap_or(0),
        total_test_cases: sums.total_test_cases.unwrap_or(0),
        passed_test_cases: sums.passed_test_cases.unwrap_or(0),
        passed_with_issues_test_cases: sums.passed_with_issues_test_cases.unwrap_or(0),
        failed_test_cases: sums.failed_test_cases.unwrap_or(0),
        blocked_test_cases: sums.blocked_test_cases.unwrap_or(0),
        cancelled_test_cases: sums.cancelled_test_cases.unwrap_or(0),
        deferred_test_cases: sums.deferred_test_cases.unwrap_or(0),
        not_testable_test_cases: sums.not_testable_test_cases.unwrap_or(0),
        total_issues: sums.total_issues.unwrap_or(0),
        critical_issues: sums.critical_issues.unwrap_or(0),
        high_issues: sums.high_issues.unwrap_or(0),
        medium_issues: sums.medium_issues.unwrap_or(0),
        low_issues: sums.low_issues.unwrap_or(0),
        new_issues: sums.new_issues.unwrap_or(0),
        fixed_issues: sums.fixed_issues.unwrap_or(0),
        not_fixed_issues: sums.not_fixed_issues.unwrap_or(0),
        reopened_issues: sums.reopened_issues.unwrap_or(0),
        deferred_issues: sums.deferred_issues.unwrap_or(0),
        total_enhancements: sums.total_enhancements.unwrap_or(0),
        new_enhancements: sums.new_enhancements.unwrap_or(0),
        implemented_enhancements: sums.implemented_enhancements.unwrap_or(0),
        exists_enhancements: sums.exists_enhancements.unwrap_or(0),
        automation_total_test_cases: sums.automation_total_test_cases.unwrap_or(0),
        automation_passed_test_cases: sums.automation_passed_test_cases.unwrap_or(0),
        automation_failed_test_cases: sums.automation_failed_test_cases.unwrap_or(0),
        automation_skipped_test_cases: sums.automation_skipped_test_cases.unwrap_or(0),
        automation_stable_tests: sums.automation_stable_tests.unwrap_or(0),
        automation_flaky_tests: sums.automation_flaky_tests.unwrap_or(0),
    }
}

/// Assemble one project's rollup from its summed counters and resolved
/// latest report.
pub fn build_project_rollup(sums: &GroupSums, latest: Option<&GroupLatest>) -> ProjectRollup {
    let total_user_stories = sums.total_user_stories.unwrap_or(0);
    let total_test_cases = sums.total_test_cases.unwrap_or(0);
    let total_issues = sums.total_issues.unwrap_or(0);
    let automation_total = sums.automation_total_test_cases.unwrap_or(0);

    let successful_user_stories =
        sums.passed_user_stories.unwrap_or(0) + sums.passed_with_issues_user_stories.unwrap_or(0);
    let successful_test_cases =
        sums.passed_test_cases.unwrap_or(0) + sums.passed_with_issues_test_cases.unwrap_or(0);

    ProjectRollup {
        portfolio_name: sums.portfolio_name.clone(),
        project_name: sums.project_name.clone(),
        total_reports: sums.total_reports,
        last_report_date: latest.and_then(|l| l.last_report_date.clone()),
        testing_status: latest
            .map(|l| l.testing_status.clone())
            .unwrap_or_else(|| "pending".to_string()),
        risk_level: risk_level(
            sums.critical_issues.unwrap_or(0),
            sums.high_issues.unwrap_or(0),
        )
        .to_string(),

        total_user_stories,
        total_test_cases,
        total_issues,
        total_enhancements: sums.total_enhancements.unwrap_or(0),

        passed_user_stories: sums.passed_user_stories.unwrap_or(0),
        passed_with_issues_user_stories: sums.passed_with_issues_user_stories.unwrap_or(0),
        failed_user_stories: sums.failed_user_stories.unwrap_or(0),
        blocked_user_stories: sums.blocked_user_stories.unwrap_or(0),
        cancelled_user_stories: sums.cancelled_user_stories.unwrap_or(0),
        deferred_user_stories: sums.deferred_user_stories.unwrap_or(0),
        not_testable_user_stories: sums.not_testable_user_stories.unwrap_or(0),
        user_stories_success_rate: success_rate(successful_user_stories, total_user_stories),

        passed_test_cases: sums.passed_test_cases.unwrap_or(0),
        passed_with_issues_test_cases: sums.passed_with_issues_test_cases.unwrap_or(0),
        failed_test_cases: sums.failed_test_cases.unwrap_or(0),
        blocked_test_cases: sums.blocked_test_cases.unwrap_or(0),
        cancelled_test_cases: sums.cancelled_test_cases.unwrap_or(0),
        deferred_test_cases: sums.deferred_test_cases.unwrap_or(0),
        not_testable_test_cases: sums.not_testable_test_cases.unwrap_or(0),
        test_cases_success_rate: success_rate(successful_test_cases, total_test_cases),

        critical_issues: sums.critical_issues.unwrap_or(0),
        high_issues: sums.high_issues.unwrap_or(0),
        medium_issues: sums.medium_issues.unwrap_or(0),
        low_issues: sums.low_issues.unwrap_or(0),

        new_issues: sums.new_issues.unwrap_or(0),
        fixed_issues: sums.fixed_issues.unwrap_or(0),
        not_fixed_issues: sums.not_fixed_issues.unwrap_or(0),
        reopened_issues: sums.reopened_issues.unwrap_or(0),
        deferred_issues: sums.deferred_issues.unwrap_or(0),
        issues_resolution_rate: success_rate(sums.fixed_issues.unwrap_or(0), total_issues),

        new_enhancements: sums.new_enhancements.unwrap_or(0),
        implemented_enhancements: sums.implemented_enhancements.unwrap_or(0),
        exists_enhancements: sums.exists_enhancements.unwrap_or(0),

        automation_total_tests: automation_total,
        automation_passed_tests: sums.automation_passed_test_cases.unwrap_or(0),
        automation_failed_tests: sums.automation_failed_test_cases.unwrap_or(0),
        automation_skipped_tests: sums.automation_skipped_test_cases.unwrap_or(0),
        automation_stable_tests: sums.automation_stable_tests.unwrap_or(0),
        automation_flaky_tests: sums.automation_flaky_tests.unwrap_or(0),
        automation_pass_rate: success_rate(
            sums.automation_passed_test_cases.unwrap_or(0),
            automation_total,
        ),
    }
}

/// Run the full live dashboard rollup.
pub async fn compute_dashboard(pool: &DbPool) -> AppResult<DashboardStatsResponse> {
    let counts = pool.count_reports_by_status().await?;
    let sums = pool.global_sums().await?;
    let groups = pool.group_sums().await?;
    let status_rows = pool.status_rows().await?;

    let latest = resolve_latest(&status_rows);
    let overall = build_overall(counts.total, counts.completed, counts.in_progress, &sums);
    let projects = groups
        .iter()
        .map(|group| {
            let key = (group.portfolio_name.clone(), group.project_name.clone());
            build_project_rollup(group, latest.get(&key))
        })
        .collect();

    Ok(DashboardStatsResponse { overall, projects })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_row(id: i32, project: &str, status: &str, date: Option<&str>) -> StatusRow {
        StatusRow {
            id,
            portfolio_name: "P1".to_string(),
            project_name: project.to_string(),
            testing_status: status.to_string(),
            report_date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(risk_level(1, 0), "High");
        assert_eq!(risk_level(3, 5), "High");
        assert_eq!(risk_level(0, 2), "Medium");
        assert_eq!(risk_level(0, 0), "Low");
    }

    #[test]
    fn test_group_risk_is_high_when_any_report_has_criticals() {
        // Two reports in one group, criticals 1 and 0; the summed group
        // count drives the classification.
        let sums = GroupSums {
            portfolio_name: "P1".to_string(),
            project_name: "A".to_string(),
            total_reports: 2,
            critical_issues: Some(1),
            high_issues: Some(0),
            ..Default::default()
        };
        let rollup = build_project_rollup(&sums, None);
        assert_eq!(rollup.risk_level, "High");
    }

    #[test]
    fn test_success_rate_rounds_to_one_decimal_and_guards_zero() {
        assert_eq!(success_rate(2, 3), 66.7);
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(5, 0), 0.0);
        assert_eq!(success_rate(7, 7), 100.0);
    }

    #[test]
    fn test_resolve_latest_orders_by_parsed_date_not_text() {
        // Lexicographically "09-01-2025" > "10-03-2025", but as a date
        // it is earlier.
        let rows = [
            status_row(1, "A", "failed", Some("09-01-2025")),
            status_row(2, "A", "passed", Some("10-03-2025")),
        ];
        let latest = resolve_latest(&rows);
        let group = &latest[&("P1".to_string(), "A".to_string())];
        assert_eq!(group.testing_status, "passed");
        assert_eq!(group.last_report_date.as_deref(), Some("10-03-2025"));
    }

    #[test]
    fn test_resolve_latest_tie_breaks_on_highest_id() {
        let rows = [
            status_row(4, "A", "passed", Some("01-06-2025")),
            status_row(9, "A", "failed", Some("01-06-2025")),
        ];
        let latest = resolve_latest(&rows);
        assert_eq!(
            latest[&("P1".to_string(), "A".to_string())].testing_status,
            "failed"
        );
    }

    #[test]
    fn test_resolve_latest_skips_malformed_dates() {
        let rows = [
            status_row(1, "A", "passed", Some("15-02-2025")),
            status_row(7, "A", "failed", Some("not-a-date")),
        ];
        let latest = resolve_latest(&rows);
        // The malformed row is excluded from date ordering even though
        // it has the higher id.
        assert_eq!(
            latest[&("P1".to_string(), "A".to_string())].testing_status,
            "passed"
        );
    }

    #[test]
    fn test_resolve_latest_all_dates_malformed_falls_back_to_id() {
        let rows = [
            status_row(1, "A", "passed", None),
            status_row(3, "A", "blocked", Some("garbage")),
        ];
        let latest = resolve_latest(&rows);
        let group = &latest[&("P1".to_string(), "A".to_string())];
        assert_eq!(group.testing_status, "blocked");
        assert_eq!(group.last_report_date, None);
    }

    #[test]
    fn test_resolve_latest_groups_are_independent() {
        let rows = [
            status_row(1, "A", "passed", Some("01-01-2025")),
            status_row(2, "B", "failed", Some("01-01-2025")),
        ];
        let latest = resolve_latest(&rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(
            latest[&("P1".to_string(), "B".to_string())].testing_status,
            "failed"
        );
    }

    fn group(project: &str, user_stories: i64, critical: i64) -> GroupSums {
        GroupSums {
            portfolio_name: "P1".to_string(),
            project_name: project.to_string(),
            total_reports: 1,
            total_user_stories: Some(user_stories),
            passed_user_stories: Some(user_stories),
            critical_issues: Some(critical),
            total_issues: Some(critical),
            ..Default::default()
        }
    }

    #[test]
    fn test_global_sums_equal_sum_of_group_sums() {
        let groups = [group("A", 12, 2), group("B", 30, 0)];
        let global = GlobalSums {
            total_user_stories: Some(42),
            passed_user_stories: Some(42),
            critical_issues: Some(2),
            total_issues: Some(2),
            ..Default::default()
        };

        let overall = build_overall(2, 0, 0, &global);
        let rollups: Vec<ProjectRollup> = groups
            .iter()
            .map(|g| build_project_rollup(g, None))
            .collect();

        assert_eq!(
            overall.total_user_stories,
            rollups.iter().map(|r| r.total_user_stories).sum::<i64>()
        );
        assert_eq!(
            overall.total_issues,
            rollups.iter().map(|r| r.total_issues).sum::<i64>()
        );
        assert_eq!(
            overall.total_reports,
            rollups.iter().map(|r| r.total_reports).sum::<i64>()
        );
    }

    #[test]
    fn test_build_overall_pending_is_remainder() {
        let overall = build_overall(10, 4, 3, &GlobalSums::default());
        assert_eq!(overall.pending_reports, 3);
        assert_eq!(overall.total_user_stories, 0);
    }

    #[test]
    fn test_project_rollup_defaults_status_to_pending() {
        let sums = GroupSums {
            portfolio_name: "P1".to_string(),
            project_name: "A".to_string(),
            total_reports: 1,
            ..Default::default()
        };
        let rollup = build_project_rollup(&sums, None);
        assert_eq!(rollup.testing_status, "pending");
        assert_eq!(rollup.last_report_date, None);
    }
}
