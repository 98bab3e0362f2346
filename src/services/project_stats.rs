//! Per-project statistics: live aggregation over one project's reports.

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde_json::Value as JsonValue;

use crate::db::DbPool;
use crate::entity::report;
use crate::error::AppResult;
use crate::models::{ProjectOverall, ProjectStatsResponse, TimeStats};
use crate::services::rollup::REPORT_DATE_FORMAT;
use crate::services::totals::round2;

/// Statistics for one project (lookup entity id). Unknown projects and
/// projects without reports get a zeroed response, never an error.
pub async fn project_stats(pool: &DbPool, project_id: i32) -> AppResult<ProjectStatsResponse> {
    let Some((project, _portfolio)) = pool.get_project(project_id).await? else {
        return Ok(empty_response());
    };

    let reports = pool.find_reports_by_project_name(project.name.trim()).await?;
    if reports.is_empty() {
        return Ok(empty_response());
    }

    Ok(ProjectStatsResponse {
        overall: build_overall(&reports),
        testers: unique_testers(&reports),
        time_stats: time_stats(&reports),
        reports,
    })
}

fn empty_response() -> ProjectStatsResponse {
    ProjectStatsResponse {
        overall: ProjectOverall {
            last_release: "N/A".to_string(),
            latest_release_number: "N/A".to_string(),
            ..Default::default()
        },
        testers: Vec::new(),
        reports: Vec::new(),
        time_stats: TimeStats::default(),
    }
}

fn sum(reports: &[report::Model], field: impl Fn(&report::Model) -> i32) -> i64 {
    reports.iter().map(|r| i64::from(field(r))).sum()
}

fn rate(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    round2(numerator as f64 / denominator as f64 * 100.0)
}

/// Aggregate totals and rates over the project's reports, oldest first.
pub fn build_overall(reports: &[report::Model]) -> ProjectOverall {
    let total_user_stories = sum(reports, |r| r.total_user_stories);
    let total_test_cases = sum(reports, |r| r.total_test_cases);
    let total_issues = sum(reports, |r| r.total_issues);
    let total_enhancements = sum(reports, |r| r.total_enhancements);

    let passed_user_stories = sum(reports, |r| r.passed_user_stories);
    let passed_test_cases = sum(reports, |r| r.passed_test_cases);
    let fixed_issues = sum(reports, |r| r.fixed_issues);
    let implemented_enhancements = sum(reports, |r| r.implemented_enhancements);

    let automation_total = sum(reports, |r| r.automation_total_test_cases);
    let automation_passed = sum(reports, |r| r.automation_passed_test_cases);
    let automation_stable = sum(reports, |r| r.automation_stable_tests);
    let automation_flaky = sum(reports, |r| r.automation_flaky_tests);

    let last = reports.last();

    ProjectOverall {
        total_reports: reports.len() as i64,
        total_user_stories,
        total_test_cases,
        total_issues,
        total_enhancements,
        last_release: last
            .and_then(|r| r.report_version.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        latest_release_number: last
            .and_then(|r| r.release_number.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        user_story_success_rate: rate(passed_user_stories, total_user_stories),
        test_case_success_rate: rate(passed_test_cases, total_test_cases),
        issue_fix_rate: rate(fixed_issues, total_issues),
        enhancement_completion_rate: rate(implemented_enhancements, total_enhancements),
        passed_user_stories,
        passed_test_cases,
        fixed_issues,
        implemented_enhancements,
        total_automation_test_cases: automation_total,
        automation_passed_test_cases: automation_passed,
        automation_failed_test_cases: sum(reports, |r| r.automation_failed_test_cases),
        automation_skipped_test_cases: sum(reports, |r| r.automation_skipped_test_cases),
        automation_stable_tests: automation_stable,
        automation_flaky_tests: automation_flaky,
        automation_pass_rate: rate(automation_passed, automation_total),
        automation_stability_rate: rate(automation_stable, automation_stable + automation_flaky),
    }
}

/// Merge tester sub-documents across reports, deduplicated by email.
/// Entries without an email string are kept as-is (they cannot collide).
pub fn unique_testers(reports: &[report::Model]) -> Vec<JsonValue> {
    let mut seen = HashSet::new();
    let mut testers = Vec::new();

    for report in reports {
        let Some(entries) = report.tester_data.as_array() else {
            continue;
        };
        for entry in entries {
            match entry.get("email").and_then(JsonValue::as_str) {
                Some(email) => {
                    if seen.insert(email.to_string()) {
                        testers.push(entry.clone());
                    }
                }
                None => testers.push(entry.clone()),
            }
        }
    }

    testers
}

/// Monthly (`YYYY-MM`) and quarterly (`YYYY-Qn`) report counts from
/// parsed report dates. Unparseable dates are skipped.
pub fn time_stats(reports: &[report::Model]) -> TimeStats {
    let mut monthly: BTreeMap<String, i64> = BTreeMap::new();
    let mut quarterly: BTreeMap<String, i64> = BTreeMap::new();

    for report in reports {
        let Some(date) = report
            .report_date
            .as_deref()
            .and_then(|text| NaiveDate::parse_from_str(text, REPORT_DATE_FORMAT).ok())
        else {
            continue;
        };

        let month_key = format!("{:04}-{:02}", date.year(), date.month());
        let quarter_key = format!("{}-Q{}", date.year(), (date.month() - 1) / 3 + 1);
        *monthly.entry(month_key).or_default() += 1;
        *quarterly.entry(quarter_key).or_default() += 1;
    }

    TimeStats { monthly, quarterly }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::default_model;
    use crate::services::totals::calculate_totals;
    use serde_json::json;

    fn report_with(date: Option<&str>, passed_stories: i32, fixed: i32) -> report::Model {
        let mut r = default_model();
        r.report_date = date.map(str::to_string);
        r.passed_user_stories = passed_stories;
        r.fixed_issues = fixed;
        r.critical_issues = fixed; // give total_issues a denominator
        calculate_totals(&mut r);
        r
    }

    #[test]
    fn test_build_overall_rates_round_to_two_decimals() {
        let mut a = report_with(None, 2, 1);
        a.failed_user_stories = 1;
        calculate_totals(&mut a);
        let overall = build_overall(&[a]);

        assert_eq!(overall.total_user_stories, 3);
        assert_eq!(overall.user_story_success_rate, 66.67);
        assert_eq!(overall.issue_fix_rate, 100.0);
    }

    #[test]
    fn test_build_overall_handles_empty_denominators() {
        let overall = build_overall(&[report_with(None, 0, 0)]);
        assert_eq!(overall.user_story_success_rate, 0.0);
        assert_eq!(overall.automation_pass_rate, 0.0);
        assert_eq!(overall.automation_stability_rate, 0.0);
    }

    #[test]
    fn test_last_release_comes_from_newest_report() {
        let mut old = report_with(None, 0, 0);
        old.report_version = Some("1.0".to_string());
        old.release_number = Some("1.0".to_string());
        let mut new = report_with(None, 0, 0);
        new.report_version = Some("1.2".to_string());
        new.release_number = Some("2.0".to_string());

        let overall = build_overall(&[old, new]);
        assert_eq!(overall.last_release, "1.2");
        assert_eq!(overall.latest_release_number, "2.0");
    }

    #[test]
    fn test_unique_testers_dedupes_by_email() {
        let mut a = default_model();
        a.tester_data = json!([
            {"name": "Sam", "email": "sam@example.com"},
            {"name": "Lee", "email": "lee@example.com"}
        ]);
        let mut b = default_model();
        b.tester_data = json!([
            {"name": "Sam Updated", "email": "sam@example.com"}
        ]);

        let testers = unique_testers(&[a, b]);
        assert_eq!(testers.len(), 2);
        assert_eq!(testers[0]["name"], "Sam");
    }

    #[test]
    fn test_time_stats_buckets_months_and_quarters() {
        let reports = [
            report_with(Some("15-02-2025"), 0, 0),
            report_with(Some("20-02-2025"), 0, 0),
            report_with(Some("01-07-2025"), 0, 0),
            report_with(Some("bad-date"), 0, 0),
            report_with(None, 0, 0),
        ];

        let stats = time_stats(&reports);
        assert_eq!(stats.monthly.get("2025-02"), Some(&2));
        assert_eq!(stats.monthly.get("2025-07"), Some(&1));
        assert_eq!(stats.quarterly.get("2025-Q1"), Some(&2));
        assert_eq!(stats.quarterly.get("2025-Q3"), Some(&1));
        assert_eq!(stats.monthly.len(), 2);
    }
}
