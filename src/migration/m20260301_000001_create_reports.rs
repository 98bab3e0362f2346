//! Migration: Create reports table and shared trigger function.
//!
//! Every derived column (totals, percentages, scores) is stored
//! denormalized so dashboard rollups are plain SUM/GROUP BY queries.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TABLE reports (
                    id SERIAL PRIMARY KEY,

                    -- Cover information (portfolio/project names are the
                    -- rollup group key, free text by design)
                    portfolio_name VARCHAR(200) NOT NULL,
                    project_name VARCHAR(200) NOT NULL,
                    sprint_number INTEGER NOT NULL DEFAULT 1,
                    report_version VARCHAR(50),
                    report_name VARCHAR(300),
                    report_type VARCHAR(50) NOT NULL DEFAULT 'sprint',
                    cycle_number INTEGER NOT NULL DEFAULT 1,
                    release_number VARCHAR(50),
                    report_date VARCHAR(20),
                    test_environment VARCHAR(200),
                    test_summary TEXT,
                    testing_status VARCHAR(50) NOT NULL DEFAULT 'pending',

                    -- Opaque JSON sub-documents
                    request_data JSONB NOT NULL DEFAULT '[]'::jsonb,
                    build_data JSONB NOT NULL DEFAULT '[]'::jsonb,
                    tester_data JSONB NOT NULL DEFAULT '[]'::jsonb,
                    team_member_data JSONB NOT NULL DEFAULT '[]'::jsonb,

                    -- User stories breakdown
                    total_user_stories INTEGER NOT NULL DEFAULT 0,
                    passed_user_stories INTEGER NOT NULL DEFAULT 0,
                    passed_with_issues_user_stories INTEGER NOT NULL DEFAULT 0,
                    failed_user_stories INTEGER NOT NULL DEFAULT 0,
                    blocked_user_stories INTEGER NOT NULL DEFAULT 0,
                    cancelled_user_stories INTEGER NOT NULL DEFAULT 0,
                    deferred_user_stories INTEGER NOT NULL DEFAULT 0,
                    not_testable_user_stories INTEGER NOT NULL DEFAULT 0,

                    -- Test cases breakdown
                    total_test_cases INTEGER NOT NULL DEFAULT 0,
                    passed_test_cases INTEGER NOT NULL DEFAULT 0,
                    passed_with_issues_test_cases INTEGER NOT NULL DEFAULT 0,
                    failed_test_cases INTEGER NOT NULL DEFAULT 0,
                    blocked_test_cases INTEGER NOT NULL DEFAULT 0,
                    cancelled_test_cases INTEGER NOT NULL DEFAULT 0,
                    deferred_test_cases INTEGER NOT NULL DEFAULT 0,
                    not_testable_test_cases INTEGER NOT NULL DEFAULT 0,

                    -- Issues by priority and by status
                    total_issues INTEGER NOT NULL DEFAULT 0,
                    total_issues_by_status INTEGER NOT NULL DEFAULT 0,
                    critical_issues INTEGER NOT NULL DEFAULT 0,
                    high_issues INTEGER NOT NULL DEFAULT 0,
                    medium_issues INTEGER NOT NULL DEFAULT 0,
                    low_issues INTEGER NOT NULL DEFAULT 0,
                    new_issues INTEGER NOT NULL DEFAULT 0,
                    fixed_issues INTEGER NOT NULL DEFAULT 0,
                    not_fixed_issues INTEGER NOT NULL DEFAULT 0,
                    reopened_issues INTEGER NOT NULL DEFAULT 0,
                    deferred_issues INTEGER NOT NULL DEFAULT 0,
                    deferred_old_bugs_issues INTEGER NOT NULL DEFAULT 0,
                    total_issues_open_status INTEGER NOT NULL DEFAULT 0,
                    total_issues_resolution_status INTEGER NOT NULL DEFAULT 0,

                    -- Enhancements breakdown
                    total_enhancements INTEGER NOT NULL DEFAULT 0,
                    new_enhancements INTEGER NOT NULL DEFAULT 0,
                    implemented_enhancements INTEGER NOT NULL DEFAULT 0,
                    exists_enhancements INTEGER NOT NULL DEFAULT 0,

                    -- Testing metrics
                    user_stories_metric INTEGER NOT NULL DEFAULT 0,
                    test_cases_metric INTEGER NOT NULL DEFAULT 0,
                    issues_metric INTEGER NOT NULL DEFAULT 0,
                    enhancements_metric INTEGER NOT NULL DEFAULT 0,

                    -- QA notes
                    qa_notes_data JSONB NOT NULL DEFAULT '[]'::jsonb,
                    qa_note_fields_data JSONB NOT NULL DEFAULT '[]'::jsonb,

                    -- Automation report sub-documents
                    covered_services JSONB NOT NULL DEFAULT '[]'::jsonb,
                    covered_modules JSONB NOT NULL DEFAULT '[]'::jsonb,
                    bugs JSONB NOT NULL DEFAULT '[]'::jsonb,

                    -- Automation regression counters and percentages
                    automation_passed_test_cases INTEGER NOT NULL DEFAULT 0,
                    automation_failed_test_cases INTEGER NOT NULL DEFAULT 0,
                    automation_skipped_test_cases INTEGER NOT NULL DEFAULT 0,
                    automation_total_test_cases INTEGER NOT NULL DEFAULT 0,
                    automation_passed_percentage DOUBLE PRECISION NOT NULL DEFAULT 0,
                    automation_failed_percentage DOUBLE PRECISION NOT NULL DEFAULT 0,
                    automation_skipped_percentage DOUBLE PRECISION NOT NULL DEFAULT 0,
                    automation_stable_tests INTEGER NOT NULL DEFAULT 0,
                    automation_flaky_tests INTEGER NOT NULL DEFAULT 0,
                    automation_stability_total INTEGER NOT NULL DEFAULT 0,
                    automation_stable_percentage DOUBLE PRECISION NOT NULL DEFAULT 0,
                    automation_flaky_percentage DOUBLE PRECISION NOT NULL DEFAULT 0,

                    -- Performance report fields
                    test_objective TEXT,
                    test_scope TEXT,
                    number_of_users INTEGER NOT NULL DEFAULT 0,
                    execution_duration VARCHAR(100),
                    user_load VARCHAR(100),
                    response_time VARCHAR(100),
                    request_volume VARCHAR(100),
                    error_rate VARCHAR(100),
                    slowest VARCHAR(200),
                    fastest VARCHAR(200),
                    total_requests INTEGER NOT NULL DEFAULT 0,
                    failed_requests INTEGER NOT NULL DEFAULT 0,
                    failure_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
                    status_codes JSONB NOT NULL DEFAULT '[]'::jsonb,
                    average_response VARCHAR(100),
                    average_response_unit VARCHAR(20) NOT NULL DEFAULT 'ms',
                    max_response VARCHAR(100),
                    max_response_unit VARCHAR(20) NOT NULL DEFAULT 'ms',
                    performance_scenarios JSONB NOT NULL DEFAULT '[]'::jsonb,
                    http_requests_data JSONB NOT NULL DEFAULT '[]'::jsonb,

                    -- Evaluation scores with free-text reasons
                    involvement_score INTEGER NOT NULL DEFAULT 0,
                    involvement_reason TEXT,
                    requirements_quality_score INTEGER NOT NULL DEFAULT 0,
                    requirements_quality_reason TEXT,
                    qa_plan_review_score INTEGER NOT NULL DEFAULT 0,
                    qa_plan_review_reason TEXT,
                    ux_score INTEGER NOT NULL DEFAULT 0,
                    ux_reason TEXT,
                    cooperation_score INTEGER NOT NULL DEFAULT 0,
                    cooperation_reason TEXT,
                    critical_bugs_score INTEGER NOT NULL DEFAULT 0,
                    critical_bugs_reason TEXT,
                    high_bugs_score INTEGER NOT NULL DEFAULT 0,
                    high_bugs_reason TEXT,
                    medium_bugs_score INTEGER NOT NULL DEFAULT 0,
                    medium_bugs_reason TEXT,
                    low_bugs_score INTEGER NOT NULL DEFAULT 0,
                    low_bugs_reason TEXT,
                    final_evaluation_score INTEGER NOT NULL DEFAULT 0,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Rollup group key
                CREATE INDEX idx_reports_portfolio_project
                    ON reports(portfolio_name, project_name);

                -- Status breakdown for the dashboard
                CREATE INDEX idx_reports_testing_status ON reports(testing_status);

                -- Listing newest-first
                CREATE INDEX idx_reports_created_at ON reports(created_at DESC);

                CREATE TRIGGER update_reports_updated_at
                    BEFORE UPDATE ON reports
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_reports_updated_at ON reports;
                DROP TABLE IF EXISTS reports CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
