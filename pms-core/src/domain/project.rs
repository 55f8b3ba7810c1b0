//! Project domain model

use super::common::EntityId;
use super::team::Team;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PLANNING" => Ok(ProjectStatus::Planning),
            "ACTIVE" => Ok(ProjectStatus::Active),
            "ON_HOLD" => Ok(ProjectStatus::OnHold),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "CANCELLED" => Ok(ProjectStatus::Cancelled),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Planning => write!(f, "PLANNING"),
            ProjectStatus::Active => write!(f, "ACTIVE"),
            ProjectStatus::OnHold => write!(f, "ON_HOLD"),
            ProjectStatus::Completed => write!(f, "COMPLETED"),
            ProjectStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Project entity with its team hydrated.
///
/// A missing `owner_id` or `team` is treated as "no match" by the
/// evaluator, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner_id: Option<EntityId>,
    pub team: Option<Team>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, owner_id: Option<EntityId>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new_v4(),
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            start_date: None,
            end_date: None,
            owner_id,
            team: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    pub fn team_id(&self) -> Option<EntityId> {
        self.team.as_ref().map(|t| t.id)
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateProjectInput {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub team_id: Option<EntityId>,
}

/// Input for updating a project
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateProjectInput {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub team_id: Option<EntityId>,
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

fn check_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::new("end_before_start")),
        _ => Ok(()),
    }
}

fn validate_create_dates(input: &CreateProjectInput) -> Result<(), ValidationError> {
    check_date_order(input.start_date, input.end_date)
}

fn validate_update_dates(input: &UpdateProjectInput) -> Result<(), ValidationError> {
    check_date_order(input.start_date, input.end_date)
}
