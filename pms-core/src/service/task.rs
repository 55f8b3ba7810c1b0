//! Task business logic

use crate::domain::{
    normalize_tags, Actor, CreateTaskInput, EntityId, Project, Task, TaskStatus, UpdateTaskInput,
};
use crate::error::{AppError, Result};
use crate::policy::{self, AccessFilter, PolicyAction, PolicyInput, ResourceScope};
use crate::repository::{ProjectRepository, TaskRepository, UserRepository};
use crate::telemetry::metrics::record_operation;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct TaskService<T: TaskRepository, P: ProjectRepository, U: UserRepository> {
    repo: Arc<T>,
    project_repo: Arc<P>,
    user_repo: Arc<U>,
}

impl<T: TaskRepository, P: ProjectRepository, U: UserRepository> TaskService<T, P, U> {
    pub fn new(repo: Arc<T>, project_repo: Arc<P>, user_repo: Arc<U>) -> Self {
        Self {
            repo,
            project_repo,
            user_repo,
        }
    }

    /// Tasks visible to `actor`, newest first
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Task>> {
        self.repo
            .list_accessible(&AccessFilter::for_actor(actor))
            .await
    }

    pub async fn get(&self, actor: &Actor, id: EntityId) -> Result<Task> {
        let task = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TaskView, ResourceScope::Task(&task)),
        )?;
        Ok(task)
    }

    /// Number of visible tasks in `status`
    pub async fn count_by_status(&self, actor: &Actor, status: TaskStatus) -> Result<u64> {
        self.repo
            .count_accessible_by_status(&AccessFilter::for_actor(actor), status)
            .await
    }

    /// Create a task. Without an explicit assignee the creator is assigned.
    pub async fn create(&self, actor: &Actor, input: CreateTaskInput) -> Result<Task> {
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ResourceCreate, ResourceScope::Global),
        )?;
        input.validate()?;

        let project = match input.project_id {
            Some(project_id) => Some(self.usable_project(actor, project_id).await?),
            None => None,
        };
        let assignee_id = match input.assignee_id {
            Some(assignee_id) => self.existing_user(assignee_id).await?,
            None => actor.id,
        };

        let now = Utc::now();
        let task = Task {
            id: EntityId::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
            assignee_id: Some(assignee_id),
            project,
            tags: normalize_tags(input.tags.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };

        let result = self.repo.create(&task).await;
        record_operation("task", "create", result.is_ok());
        let task = result?;
        info!(
            task_id = %task.id,
            project_id = ?task.project_id(),
            assignee_id = %assignee_id,
            "Task created"
        );
        Ok(task)
    }

    /// Apply a partial update. All checks run before anything is persisted.
    pub async fn update(
        &self,
        actor: &Actor,
        id: EntityId,
        input: UpdateTaskInput,
    ) -> Result<Task> {
        input.validate()?;
        let existing = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TaskEdit, ResourceScope::Task(&existing)),
        )?;

        let mut task = existing.clone();
        if let Some(title) = input.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = input.description {
            task.description = Some(description);
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        if input.due_date.is_some() {
            task.due_date = input.due_date;
        }
        if let Some(project_id) = input.project_id {
            if existing.project_id() != Some(project_id) {
                task.project = Some(self.usable_project(actor, project_id).await?);
            }
        }
        if let Some(assignee_id) = input.assignee_id {
            if existing.assignee_id != Some(assignee_id) {
                task.assignee_id = Some(self.existing_user(assignee_id).await?);
            }
        }
        if let Some(tags) = input.tags {
            task.tags = normalize_tags(tags);
        }

        let result = self.repo.update(&task).await;
        record_operation("task", "update", result.is_ok());
        let task = result?;
        info!(task_id = %task.id, actor_id = %actor.id, "Task updated");
        Ok(task)
    }

    pub async fn delete(&self, actor: &Actor, id: EntityId) -> Result<()> {
        let task = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TaskEdit, ResourceScope::Task(&task)),
        )?;

        let result = self.repo.delete(id).await;
        record_operation("task", "delete", result.is_ok());
        result?;
        info!(task_id = %id, actor_id = %actor.id, "Task deleted");
        Ok(())
    }

    async fn find(&self, id: EntityId) -> Result<Task> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PreconditionMissing(format!("Task {} not found", id)))
    }

    async fn usable_project(&self, actor: &Actor, project_id: EntityId) -> Result<Project> {
        let project = self
            .project_repo
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| {
                AppError::PreconditionMissing(format!("Project {} not found", project_id))
            })?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ProjectUse, ResourceScope::Project(&project)),
        )?;
        Ok(project)
    }

    async fn existing_user(&self, user_id: EntityId) -> Result<EntityId> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| AppError::PreconditionMissing("Assignee not found".to_string()))
    }
}
