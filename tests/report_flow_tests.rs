//! End-to-end flow tests over the library's public API: payload
//! deserialization, derived-field computation, and the version
//! suggestion a project would receive after each submission.

use serde_json::json;

use qa_dashboard_lib::models::ReportPayload;
use qa_dashboard_lib::models::report::default_model;
use qa_dashboard_lib::services::totals::calculate_totals;
use qa_dashboard_lib::services::versioning::{VersionFields, suggest_next_version};

fn fields(id: i32, sprint: i32, cycle: i32, release: &str) -> VersionFields {
    VersionFields {
        id,
        sprint_number: sprint,
        cycle_number: cycle,
        release_number: Some(release.to_string()),
    }
}

#[test]
fn camel_case_payload_applies_and_derives_totals() {
    let payload: ReportPayload = serde_json::from_value(json!({
        "portfolioName": "Platform",
        "projectName": "Billing",
        "sprintNumber": 3,
        "reportDate": "12-05-2026",
        "passedUserStories": 8,
        "failedUserStories": 2,
        "criticalIssues": 1,
        "highIssues": 2,
        "newIssues": 2,
        "fixedIssues": 1,
        "automationPassedTestCases": 18,
        "automationFailedTestCases": 2,
        "covered_services": ["payments", "invoicing"],
        "involvementScore": 8,
        "uxScore": 7
    }))
    .expect("payload deserializes");

    let mut model = default_model();
    payload.apply(&mut model);
    calculate_totals(&mut model);

    assert_eq!(model.portfolio_name, "Platform");
    assert_eq!(model.project_name, "Billing");
    assert_eq!(model.total_user_stories, 10);
    assert_eq!(model.user_stories_metric, 10);
    assert_eq!(model.total_issues, 3);
    assert_eq!(model.total_issues_by_status, 3);
    assert_eq!(model.automation_total_test_cases, 20);
    assert_eq!(model.automation_passed_percentage, 90.0);
    assert_eq!(model.covered_services, json!(["payments", "invoicing"]));
    assert_eq!(model.final_evaluation_score, 15);
}

#[test]
fn update_overlay_keeps_absent_fields_and_recomputes() {
    let mut model = default_model();
    model.portfolio_name = "Platform".to_string();
    model.project_name = "Billing".to_string();
    model.passed_user_stories = 5;
    model.test_summary = Some("initial run".to_string());
    calculate_totals(&mut model);
    assert_eq!(model.total_user_stories, 5);

    let update: ReportPayload = serde_json::from_value(json!({
        "passedUserStories": 9
    }))
    .expect("update deserializes");
    update.apply(&mut model);
    calculate_totals(&mut model);

    assert_eq!(model.total_user_stories, 9);
    assert_eq!(model.portfolio_name, "Platform");
    assert_eq!(model.test_summary.as_deref(), Some("initial run"));
}

#[test]
fn suggestions_walk_a_project_through_sprints_and_cycles() {
    // First report of the project.
    let mut history = vec![fields(1, 1, 1, "1.0")];
    let s = suggest_next_version(&history);
    assert_eq!((s.sprint_number, s.cycle_number), (2, 1));
    assert_eq!(s.release_number, "1.0");

    // A second cycle lands in sprint 2, then a third is suggested.
    history.push(fields(2, 2, 1, "1.0"));
    history.push(fields(3, 2, 2, "1.0"));
    let s = suggest_next_version(&history);
    assert_eq!((s.sprint_number, s.cycle_number), (2, 3));

    // Sprint advances and the release moves, so the minor is bumped.
    history.push(fields(4, 3, 1, "1.1"));
    let s = suggest_next_version(&history);
    assert_eq!((s.sprint_number, s.cycle_number), (4, 1));
    assert_eq!(s.release_number, "1.2");
}

#[test]
fn empty_history_yields_starting_defaults() {
    let s = suggest_next_version(&[]);
    assert_eq!((s.sprint_number, s.cycle_number), (1, 1));
    assert_eq!(s.release_number, "1.0");
}
