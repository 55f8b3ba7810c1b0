//! Team business logic

use crate::domain::{
    normalize_team_name, team_names_match, Actor, CreateTeamInput, EntityId, Team,
    UpdateTeamInput, UpdateTeamMembersInput, TEAM_NAME_TAKEN,
};
use crate::error::{AppError, Result};
use crate::policy::{self, merge_owner, PolicyAction, PolicyInput, ResourceScope};
use crate::repository::{TeamRepository, UserRepository};
use crate::telemetry::metrics::record_operation;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct TeamService<T: TeamRepository, U: UserRepository> {
    repo: Arc<T>,
    user_repo: Arc<U>,
}

impl<T: TeamRepository, U: UserRepository> TeamService<T, U> {
    pub fn new(repo: Arc<T>, user_repo: Arc<U>) -> Self {
        Self { repo, user_repo }
    }

    /// Teams the actor owns or belongs to
    pub async fn my_teams(&self, actor: &Actor) -> Result<Vec<Team>> {
        self.repo.list_for_user(actor.id).await
    }

    /// A single team with its members; visible to admins and affiliates
    pub async fn get(&self, actor: &Actor, id: EntityId) -> Result<Team> {
        let team = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TeamView, ResourceScope::Team(&team)),
        )?;
        Ok(team)
    }

    /// Whether a team already uses `name` (case-insensitive). Blank names never exist.
    pub async fn check_name_exists(&self, name: &str) -> Result<bool> {
        match normalize_team_name(name) {
            Some(name) => self.repo.exists_by_name(&name).await,
            None => Ok(false),
        }
    }

    /// Create a team owned by `actor`, who also becomes its first member.
    pub async fn create(&self, actor: &Actor, input: CreateTeamInput) -> Result<Team> {
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::ResourceCreate, ResourceScope::Global),
        )?;
        let name = normalize_team_name(&input.name)
            .ok_or_else(|| AppError::BadRequest("Team name is required".to_string()))?;
        input.validate()?;

        // The repository rejects a clash again under its write lock
        if self.repo.exists_by_name(&name).await? {
            return Err(AppError::Conflict(TEAM_NAME_TAKEN.to_string()));
        }

        let mut team = Team::new(name, actor.id);
        team.description = input.description;

        let result = self.repo.create(&team).await;
        record_operation("team", "create", result.is_ok());
        let team = result?;
        info!(team_id = %team.id, owner_id = %actor.id, "Team created");
        Ok(team)
    }

    /// Rename or re-describe a team. A blank name keeps the current one.
    pub async fn update(
        &self,
        actor: &Actor,
        id: EntityId,
        input: UpdateTeamInput,
    ) -> Result<Team> {
        input.validate()?;
        let mut team = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TeamUpdate, ResourceScope::Team(&team)),
        )?;

        if let Some(name) = input.name.as_deref().and_then(normalize_team_name) {
            // Renaming to a different casing of the current name is not a conflict
            if !team_names_match(&name, &team.name) && self.repo.exists_by_name(&name).await? {
                return Err(AppError::Conflict(TEAM_NAME_TAKEN.to_string()));
            }
            team.name = name;
        }
        if let Some(description) = input.description {
            team.description = Some(description);
        }

        let result = self.repo.update(&team).await;
        record_operation("team", "update", result.is_ok());
        let team = result?;
        info!(team_id = %team.id, actor_id = %actor.id, "Team updated");
        Ok(team)
    }

    pub async fn delete(&self, actor: &Actor, id: EntityId) -> Result<()> {
        let team = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TeamDelete, ResourceScope::Team(&team)),
        )?;

        let result = self.repo.delete(id).await;
        record_operation("team", "delete", result.is_ok());
        result?;
        info!(team_id = %id, actor_id = %actor.id, "Team deleted");
        Ok(())
    }

    /// Replace the member set. Unknown user ids are dropped and the owner is
    /// always kept.
    pub async fn update_members(
        &self,
        actor: &Actor,
        id: EntityId,
        input: UpdateTeamMembersInput,
    ) -> Result<Team> {
        let mut team = self.find(id).await?;
        policy::enforce(
            actor,
            &PolicyInput::new(PolicyAction::TeamManageMembers, ResourceScope::Team(&team)),
        )?;

        let requested = input.member_ids.unwrap_or_default();
        let found = self.user_repo.find_all_by_ids(&requested).await?;
        team.member_ids = merge_owner(&team, found.into_iter().map(|user| user.id));

        let result = self.repo.update(&team).await;
        record_operation("team", "update_members", result.is_ok());
        let team = result?;
        info!(
            team_id = %team.id,
            actor_id = %actor.id,
            members = team.member_ids.len(),
            "Team members updated"
        );
        Ok(team)
    }

    async fn find(&self, id: EntityId) -> Result<Team> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PreconditionMissing("Team not found".to_string()))
    }
}
