//! Project business logic

use crate::domain::{Actor, CreateProjectInput, EntityId, Project, Team, UpdateProjectInput};
use crate::error::{AppError, Result};
use crate::policy::{self, AccessFilter, PolicyAction, PolicyInput, ResourceScope};
use crate::repository::{ProjectRepository, TeamRepository};
use crate::telemetry::metrics::record_operation;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct ProjectService<P: ProjectRepository, T: TeamRepository> {
    repo: Arc<P>,
    team_repo: Arc<T>,
}

impl<P: ProjectRepository, T: TeamRepository> ProjectService<P, T> {
    pub fn new(repo: Arc<P>, team_repo: Arc<T>) -> Self {
        Self { repo, team_repo }
    }

    /// Projects visible to `actor`, newest first
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Project>> {
        self.repo
            .list_accessible(&AccessFilter::for_actor(actor))
            .await
    }

    pub async fn get(&self, actor: &Actor, id: EntityId) -> Result<Project> {
        let project = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ProjectView, ResourceScope::Project(&project)),
        )?;
        Ok(project)
    }

    pub async fn create(&self, actor: &Actor, input: CreateProjectInput) -> Result<Project> {
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ResourceCreate, ResourceScope::Global),
        )?;
        input.validate()?;

        let team = match input.team_id {
            Some(team_id) => Some(self.resolve_team(actor, team_id).await?),
            None => None,
        };

        let now = Utc::now();
        let project = Project {
            id: EntityId::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description,
            status: input.status.unwrap_or_default(),
            start_date: input.start_date,
            end_date: input.end_date,
            owner_id: Some(actor.id),
            team,
            created_at: now,
            updated_at: now,
        };

        let result = self.repo.create(&project).await;
        record_operation("project", "create", result.is_ok());
        let project = result?;
        info!(project_id = %project.id, owner_id = %actor.id, "Project created");
        Ok(project)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: EntityId,
        input: UpdateProjectInput,
    ) -> Result<Project> {
        input.validate()?;
        let existing = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ProjectManage, ResourceScope::Project(&existing)),
        )?;

        let mut project = existing.clone();
        if let Some(name) = input.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            project.description = Some(description);
        }
        if let Some(status) = input.status {
            project.status = status;
        }
        if input.start_date.is_some() {
            project.start_date = input.start_date;
        }
        if input.end_date.is_some() {
            project.end_date = input.end_date;
        }
        if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
            if end < start {
                return Err(AppError::Validation(
                    "end_date must not precede start_date".to_string(),
                ));
            }
        }
        if let Some(team_id) = input.team_id {
            if existing.team_id() != Some(team_id) {
                project.team = Some(self.resolve_team(actor, team_id).await?);
            }
        }

        let result = self.repo.update(&project).await;
        record_operation("project", "update", result.is_ok());
        let project = result?;
        info!(project_id = %project.id, actor_id = %actor.id, "Project updated");
        Ok(project)
    }

    pub async fn delete(&self, actor: &Actor, id: EntityId) -> Result<()> {
        let project = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ProjectManage, ResourceScope::Project(&project)),
        )?;

        let result = self.repo.delete(id).await;
        record_operation("project", "delete", result.is_ok());
        result?;
        info!(project_id = %id, actor_id = %actor.id, "Project deleted");
        Ok(())
    }

    async fn find(&self, id: EntityId) -> Result<Project> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PreconditionMissing(format!("Project {} not found", id)))
    }

    /// Load a team the actor is allowed to attach a project to
    async fn resolve_team(&self, actor: &Actor, team_id: EntityId) -> Result<Team> {
        let team = self
            .team_repo
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| AppError::PreconditionMissing(format!("Team {} not found", team_id)))?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TeamAttach, ResourceScope::Team(&team)),
        )?;
        Ok(team)
    }
}
