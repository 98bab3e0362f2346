//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_reports;
mod m20260301_000002_create_portfolios;
mod m20260301_000003_create_projects;
mod m20260301_000004_create_testers;
mod m20260301_000005_create_team_members;
mod m20260301_000006_create_stats_cache;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_reports::Migration),
            Box::new(m20260301_000002_create_portfolios::Migration),
            Box::new(m20260301_000003_create_projects::Migration),
            Box::new(m20260301_000004_create_testers::Migration),
            Box::new(m20260301_000005_create_team_members::Migration),
            Box::new(m20260301_000006_create_stats_cache::Migration),
        ]
    }
}
