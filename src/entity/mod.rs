//! SeaORM entity definitions.

pub mod dashboard_stats;
pub mod portfolio;
pub mod portfolio_stats;
pub mod project;
pub mod project_stats;
pub mod report;
pub mod team_member;
pub mod tester;
pub mod tester_project;
