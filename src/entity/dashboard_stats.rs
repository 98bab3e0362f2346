//! Cached global dashboard snapshot.
//!
//! Single row, fully rewritten by each recompute pass.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dashboard_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub total_reports: i64,
    pub completed_reports: i64,
    pub in_progress_reports: i64,
    pub pending_reports: i64,
    pub total_user_stories: i64,
    pub total_test_cases: i64,
    pub total_issues: i64,
    pub total_enhancements: i64,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
