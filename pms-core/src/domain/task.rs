//! Task domain model

use super::common::EntityId;
use super::project::{validate_not_blank, Project};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "REVIEW" => Ok(TaskStatus::Review),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Review => write!(f, "REVIEW"),
            TaskStatus::Done => write!(f, "DONE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(TaskPriority::Low),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "HIGH" => Ok(TaskPriority::High),
            "URGENT" => Ok(TaskPriority::Urgent),
            _ => Err(format!("Unknown task priority: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "LOW"),
            TaskPriority::Medium => write!(f, "MEDIUM"),
            TaskPriority::High => write!(f, "HIGH"),
            TaskPriority::Urgent => write!(f, "URGENT"),
        }
    }
}

/// Task entity with its project (and that project's team) hydrated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: Option<EntityId>,
    pub project: Option<Project>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, assignee_id: Option<EntityId>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new_v4(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            assignee_id,
            project: None,
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }

    pub fn project_id(&self) -> Option<EntityId> {
        self.project.as_ref().map(|p| p.id)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskInput {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<EntityId>,
    /// Defaults to the creating actor when absent
    pub assignee_id: Option<EntityId>,
    pub tags: Option<Vec<String>>,
}

/// Input for updating a task
///
/// `project_id` and `assignee_id` only ever re-point the task; they cannot
/// detach it. `tags`, when present, replaces the whole tag set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<EntityId>,
    pub assignee_id: Option<EntityId>,
    pub tags: Option<Vec<String>>,
}

/// Trim tag names and drop blanks and duplicates
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
