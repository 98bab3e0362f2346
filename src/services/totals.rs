//! Derived-field computation for reports.
//!
//! `calculate_totals` is pure and idempotent. Every persist path calls
//! it once, right before writing, so derived columns are always
//! consistent with the raw counters at rest.

use crate::entity::report;

/// Percentage of `count` over `total`, rounded to 2 decimals.
/// Returns 0.0 when `total` is not positive, never NaN or infinity.
pub fn percentage(count: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(f64::from(count) / f64::from(total) * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recompute every derived field from the raw counters.
pub fn calculate_totals(report: &mut report::Model) {
    report.total_user_stories = report.passed_user_stories
        + report.passed_with_issues_user_stories
        + report.failed_user_stories
        + report.blocked_user_stories
        + report.cancelled_user_stories
        + report.deferred_user_stories
        + report.not_testable_user_stories;

    report.total_test_cases = report.passed_test_cases
        + report.passed_with_issues_test_cases
        + report.failed_test_cases
        + report.blocked_test_cases
        + report.cancelled_test_cases
        + report.deferred_test_cases
        + report.not_testable_test_cases;

    report.total_issues = report.critical_issues
        + report.high_issues
        + report.medium_issues
        + report.low_issues;

    // Six-way legacy formula. The open/resolution splits below do not
    // partition it: the generic deferred counter only appears here.
    report.total_issues_by_status = report.new_issues
        + report.fixed_issues
        + report.not_fixed_issues
        + report.reopened_issues
        + report.deferred_issues
        + report.deferred_old_bugs_issues;

    report.total_issues_open_status =
        report.new_issues + report.reopened_issues + report.deferred_old_bugs_issues;

    report.total_issues_resolution_status = report.fixed_issues + report.not_fixed_issues;

    report.total_enhancements =
        report.new_enhancements + report.implemented_enhancements + report.exists_enhancements;

    // Metrics mirror the category totals.
    report.user_stories_metric = report.total_user_stories;
    report.test_cases_metric = report.total_test_cases;
    report.issues_metric = report.total_issues;
    report.enhancements_metric = report.total_enhancements;

    report.automation_total_test_cases = report.automation_passed_test_cases
        + report.automation_failed_test_cases
        + report.automation_skipped_test_cases;
    report.automation_passed_percentage = percentage(
        report.automation_passed_test_cases,
        report.automation_total_test_cases,
    );
    report.automation_failed_percentage = percentage(
        report.automation_failed_test_cases,
        report.automation_total_test_cases,
    );
    report.automation_skipped_percentage = percentage(
        report.automation_skipped_test_cases,
        report.automation_total_test_cases,
    );

    report.automation_stability_total =
        report.automation_stable_tests + report.automation_flaky_tests;
    report.automation_stable_percentage = percentage(
        report.automation_stable_tests,
        report.automation_stability_total,
    );
    report.automation_flaky_percentage = percentage(
        report.automation_flaky_tests,
        report.automation_stability_total,
    );

    report.failure_rate = percentage(report.failed_requests, report.total_requests);

    report.final_evaluation_score = report.involvement_score
        + report.requirements_quality_score
        + report.qa_plan_review_score
        + report.ux_score
        + report.cooperation_score
        + report.critical_bugs_score
        + report.high_bugs_score
        + report.medium_bugs_score
        + report.low_bugs_score;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::default_model;

    #[test]
    fn test_user_story_and_test_case_totals_are_category_sums() {
        let mut r = default_model();
        r.passed_user_stories = 10;
        r.passed_with_issues_user_stories = 3;
        r.failed_user_stories = 2;
        r.blocked_user_stories = 1;
        r.cancelled_user_stories = 1;
        r.deferred_user_stories = 2;
        r.not_testable_user_stories = 1;
        r.passed_test_cases = 40;
        r.failed_test_cases = 5;

        calculate_totals(&mut r);

        assert_eq!(r.total_user_stories, 20);
        assert_eq!(r.user_stories_metric, 20);
        assert_eq!(r.total_test_cases, 45);
        assert_eq!(r.test_cases_metric, 45);
    }

    #[test]
    fn test_issue_totals_and_non_partition_relationship() {
        let mut r = default_model();
        r.critical_issues = 2;
        r.high_issues = 3;
        r.medium_issues = 5;
        r.low_issues = 1;
        r.new_issues = 4;
        r.fixed_issues = 3;
        r.not_fixed_issues = 1;
        r.reopened_issues = 2;
        r.deferred_issues = 2;
        r.deferred_old_bugs_issues = 1;

        calculate_totals(&mut r);

        assert_eq!(r.total_issues, 11);
        assert_eq!(r.total_issues_by_status, 13);
        assert_eq!(r.total_issues_open_status, 7);
        assert_eq!(r.total_issues_resolution_status, 4);
        // Generic deferred is only counted in the six-way total, so the
        // open/resolution split undershoots it by exactly that amount.
        assert_eq!(
            r.total_issues_open_status + r.total_issues_resolution_status,
            r.total_issues_by_status - r.deferred_issues
        );
    }

    #[test]
    fn test_open_resolution_partition_when_no_generic_deferred() {
        let mut r = default_model();
        r.new_issues = 4;
        r.fixed_issues = 3;
        r.not_fixed_issues = 1;
        r.reopened_issues = 2;
        r.deferred_old_bugs_issues = 1;

        calculate_totals(&mut r);

        assert_eq!(
            r.total_issues_open_status + r.total_issues_resolution_status,
            r.total_issues_by_status
        );
    }

    #[test]
    fn test_all_zero_report_stays_zero() {
        let mut r = default_model();
        calculate_totals(&mut r);

        assert_eq!(r.total_user_stories, 0);
        assert_eq!(r.total_test_cases, 0);
        assert_eq!(r.total_issues, 0);
        assert_eq!(r.total_issues_by_status, 0);
        assert_eq!(r.total_enhancements, 0);
        assert_eq!(r.automation_passed_percentage, 0.0);
        assert_eq!(r.automation_stable_percentage, 0.0);
        assert_eq!(r.failure_rate, 0.0);
        assert_eq!(r.final_evaluation_score, 0);
    }

    #[test]
    fn test_automation_percentages_round_to_two_decimals() {
        let mut r = default_model();
        r.automation_passed_test_cases = 1;
        r.automation_failed_test_cases = 1;
        r.automation_skipped_test_cases = 1;

        calculate_totals(&mut r);

        assert_eq!(r.automation_total_test_cases, 3);
        assert_eq!(r.automation_passed_percentage, 33.33);
        assert_eq!(r.automation_failed_percentage, 33.33);
        assert_eq!(r.automation_skipped_percentage, 33.33);
    }

    #[test]
    fn test_stability_percentages() {
        let mut r = default_model();
        r.automation_stable_tests = 7;
        r.automation_flaky_tests = 3;

        calculate_totals(&mut r);

        assert_eq!(r.automation_stability_total, 10);
        assert_eq!(r.automation_stable_percentage, 70.0);
        assert_eq!(r.automation_flaky_percentage, 30.0);
    }

    #[test]
    fn test_failure_rate_guard_and_value() {
        let mut r = default_model();
        r.failed_requests = 7;
        r.total_requests = 0;
        calculate_totals(&mut r);
        assert_eq!(r.failure_rate, 0.0);

        r.total_requests = 200;
        calculate_totals(&mut r);
        assert_eq!(r.failure_rate, 3.5);
    }

    #[test]
    fn test_final_evaluation_score_is_sum_of_sub_scores() {
        let mut r = default_model();
        r.involvement_score = 8;
        r.requirements_quality_score = 7;
        r.qa_plan_review_score = 9;
        r.ux_score = 6;
        r.cooperation_score = 8;
        r.critical_bugs_score = 10;
        r.high_bugs_score = 9;
        r.medium_bugs_score = 7;
        r.low_bugs_score = 8;

        calculate_totals(&mut r);

        assert_eq!(r.final_evaluation_score, 72);
    }

    #[test]
    fn test_calculate_totals_is_idempotent() {
        let mut r = default_model();
        r.passed_user_stories = 12;
        r.critical_issues = 2;
        r.automation_passed_test_cases = 5;
        r.automation_failed_test_cases = 2;
        r.failed_requests = 1;
        r.total_requests = 3;

        calculate_totals(&mut r);
        let first = r.clone();
        calculate_totals(&mut r);

        assert_eq!(r, first);
    }

    #[test]
    fn test_totals_are_additive_across_reports() {
        let mut a = default_model();
        a.passed_user_stories = 5;
        a.failed_user_stories = 1;
        let mut b = default_model();
        b.passed_user_stories = 7;
        b.blocked_user_stories = 2;

        calculate_totals(&mut a);
        calculate_totals(&mut b);

        let mut combined = default_model();
        combined.passed_user_stories = 12;
        combined.failed_user_stories = 1;
        combined.blocked_user_stories = 2;
        calculate_totals(&mut combined);

        assert_eq!(
            combined.total_user_stories,
            a.total_user_stories + b.total_user_stories
        );
    }
}
