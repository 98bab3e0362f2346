//! Migration: Create cached dashboard, per-portfolio, and per-project
//! stats tables.
//!
//! All three tables are snapshots rewritten wholesale on refresh;
//! readers fall back to live aggregation when they are empty.

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
                CREATE TABLE dashboard_stats (
                    id SERIAL PRIMARY KEY,
                    total_reports BIGINT NOT NULL DEFAULT 0,
                    completed_reports BIGINT NOT NULL DEFAULT 0,
                    in_progress_reports BIGINT NOT NULL DEFAULT 0,
                    pending_reports BIGINT NOT NULL DEFAULT 0,
                    total_user_stories BIGINT NOT NULL DEFAULT 0,
                    total_test_cases BIGINT NOT NULL DEFAULT 0,
                    total_issues BIGINT NOT NULL DEFAULT 0,
                    total_enhancements BIGINT NOT NULL DEFAULT 0,
                    last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TABLE portfolio_stats (
                    id SERIAL PRIMARY KEY,
                    portfolio_name VARCHAR(200) NOT NULL UNIQUE,
                    total_projects BIGINT NOT NULL DEFAULT 0,
                    total_reports BIGINT NOT NULL DEFAULT 0,
                    total_user_stories BIGINT NOT NULL DEFAULT 0,
                    total_test_cases BIGINT NOT NULL DEFAULT 0,
                    total_issues BIGINT NOT NULL DEFAULT 0,
                    total_enhancements BIGINT NOT NULL DEFAULT 0,
                    last_report_date VARCHAR(20),
                    last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TABLE project_stats (
                    id SERIAL PRIMARY KEY,
                    portfolio_name VARCHAR(200) NOT NULL,
                    project_name VARCHAR(200) NOT NULL,
                    total_reports BIGINT NOT NULL DEFAULT 0,
                    total_user_stories BIGINT NOT NULL DEFAULT 0,
                    total_test_cases BIGINT NOT NULL DEFAULT 0,
                    total_issues BIGINT NOT NULL DEFAULT 0,
                    total_enhancements BIGINT NOT NULL DEFAULT 0,
                    last_report_date VARCHAR(20),
                    latest_testing_status VARCHAR(50),
                    last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE (portfolio_name, project_name)
                );
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
                DROP TABLE IF EXISTS project_stats CASCADE;
                DROP TABLE IF EXISTS portfolio_stats CASCADE;
                DROP TABLE IF EXISTS dashboard_stats CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
