//! Payloads and responses for the lookup entities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{portfolio, project, team_member, tester};

/// Roles accepted for team members.
pub const VALID_TEAM_ROLES: &[&str] = &[
    "Project Owner",
    "Project Analyst",
    "Project Manager",
    "Business Analyst",
    "Technical Lead",
    "Scrum Master",
    "Product Owner",
    "Quality Assurance Lead",
    "DevOps Engineer",
    "UI/UX Designer",
    "Database Administrator",
    "Security Analyst",
    "System Administrator",
    "Stakeholder",
    "Client Representative",
];

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PortfolioPayload {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PortfolioResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "projectCount")]
    pub project_count: i64,
}

impl PortfolioResponse {
    pub fn from_model(model: portfolio::Model, project_count: i64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            project_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub name: String,
    pub description: Option<String>,
    pub portfolio_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_id: Option<i32>,
    pub portfolio_name: Option<String>,
}

impl ProjectResponse {
    pub fn from_model(model: project::Model, portfolio_name: Option<String>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            portfolio_id: model.portfolio_id,
            portfolio_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TesterPayload {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_automation_engineer: bool,
    #[serde(default)]
    pub is_manual_engineer: bool,
    #[serde(default)]
    pub is_performance_tester: bool,
    #[serde(default)]
    pub is_security_tester: bool,
    #[serde(default)]
    pub is_api_tester: bool,
    #[serde(default)]
    pub is_mobile_tester: bool,
    #[serde(default)]
    pub is_web_tester: bool,
    #[serde(default)]
    pub is_accessibility_tester: bool,
    #[serde(default)]
    pub is_usability_tester: bool,
    #[serde(default)]
    pub is_test_lead: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TesterResponse {
    pub id: i32,
    pub name: String,
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
    pub role_types: Vec<&'static str>,
    pub role_display: String,
    #[serde(rename = "projectIds")]
    pub project_ids: Vec<i32>,
}

impl TesterResponse {
    pub fn from_model(model: tester::Model, project_ids: Vec<i32>) -> Self {
        let role_types = model.role_types();
        let role_display = model.role_display();
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            is_automation_engineer: model.is_automation_engineer,
            is_manual_engineer: model.is_manual_engineer,
            is_performance_tester: model.is_performance_tester,
            is_security_tester: model.is_security_tester,
            is_api_tester: model.is_api_tester,
            is_mobile_tester: model.is_mobile_tester,
            is_web_tester: model.is_web_tester,
            is_accessibility_tester: model.is_accessibility_tester,
            is_usability_tester: model.is_usability_tester,
            is_test_lead: model.is_test_lead,
            role_types,
            role_display,
            project_ids,
        }
    }
}

/// Project id list for tester assignment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TesterProjectsPayload {
    pub project_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TeamMemberPayload {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamMemberResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<team_member::Model> for TeamMemberResponse {
    fn from(model: team_member::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
        }
    }
}

/// Everything the report form needs to render its dropdowns.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDataResponse {
    pub portfolios: Vec<PortfolioResponse>,
    pub projects: Vec<ProjectResponse>,
    pub testers: Vec<TesterResponse>,
    pub team_members: Vec<TeamMemberResponse>,
    pub valid_roles: Vec<&'static str>,
}
