//! Migration: Create testers table and tester/project assignment table.

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
                CREATE TABLE testers (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(200) NOT NULL,
                    email VARCHAR(320) NOT NULL UNIQUE,
                    is_automation_engineer BOOLEAN NOT NULL DEFAULT FALSE,
                    is_manual_engineer BOOLEAN NOT NULL DEFAULT FALSE,
                    is_performance_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_security_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_api_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_mobile_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_web_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_accessibility_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_usability_tester BOOLEAN NOT NULL DEFAULT FALSE,
                    is_test_lead BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TABLE tester_projects (
                    tester_id INTEGER NOT NULL REFERENCES testers(id) ON DELETE CASCADE,
                    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    PRIMARY KEY (tester_id, project_id)
                );

                CREATE INDEX idx_tester_projects_project_id ON tester_projects(project_id);
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
                DROP TABLE IF EXISTS tester_projects CASCADE;
                DROP TABLE IF EXISTS testers CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
