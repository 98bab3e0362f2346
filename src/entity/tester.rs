//! Tester entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "testers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub is_automation_engineer: bool,
    pub is_manual_engineer: bool,
    pub is_performance_tester: bool,
    pub is_security_tester: bool,
    pub is_api_tester: bool,
    pub is_mobile_tester: bool,
    pub is_web_tester: bool,
    pub is_accessibility_tester: bool,
    pub is_usability_tester: bool,
    pub is_test_lead: bool,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Display labels for the role flags that are set.
    pub fn role_types(&self) -> Vec<&'static str> {
        let flags = [
            (self.is_automation_engineer, "Automation Engineer"),
            (self.is_manual_engineer, "Manual Engineer"),
            (self.is_performance_tester, "Performance Tester"),
            (self.is_security_tester, "Security Tester"),
            (self.is_api_tester, "API Tester"),
            (self.is_mobile_tester, "Mobile Tester"),
            (self.is_web_tester, "Web Tester"),
            (self.is_accessibility_tester, "Accessibility Tester"),
            (self.is_usability_tester, "Usability Tester"),
            (self.is_test_lead, "Test Lead"),
        ];
        flags
            .into_iter()
            .filter_map(|(set, label)| set.then_some(label))
            .collect()
    }

    /// Comma-joined role labels, or "Unspecified" when no flag is set.
    pub fn role_display(&self) -> String {
        let roles = self.role_types();
        if roles.is_empty() {
            "Unspecified".to_string()
        } else {
            roles.join(", ")
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        super::tester_project::Relation::Project.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tester_project::Relation::Tester.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tester() -> Model {
        Model {
            id: 1,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            is_automation_engineer: false,
            is_manual_engineer: false,
            is_performance_tester: false,
            is_security_tester: false,
            is_api_tester: false,
            is_mobile_tester: false,
            is_web_tester: false,
            is_accessibility_tester: false,
            is_usability_tester: false,
            is_test_lead: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_display_unspecified_when_no_flags() {
        assert_eq!(tester().role_display(), "Unspecified");
    }

    #[test]
    fn test_role_display_joins_set_flags_in_order() {
        let mut t = tester();
        t.is_manual_engineer = true;
        t.is_test_lead = true;
        assert_eq!(t.role_types(), vec!["Manual Engineer", "Test Lead"]);
        assert_eq!(t.role_display(), "Manual Engineer, Test Lead");
    }
}
