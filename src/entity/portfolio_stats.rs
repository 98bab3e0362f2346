//! Cached per-portfolio rollup snapshot, folded from the project
//! snapshots on each refresh.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "portfolio_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub portfolio_name: String,
    pub total_projects: i64,
    pub total_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_report_date: Option<String>,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
