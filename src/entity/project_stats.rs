//! Cached per-project rollup snapshot, keyed by the free-text
//! (portfolio_name, project_name) group.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "project_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub portfolio_name: String,
    pub project_name: String,
    pub total_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_report_date: Option<String>,
    pub latest_testing_status: Option<String>,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
