//! Centralized access-control evaluator for projects, tasks and teams.
//!
//! Every service call site asks this module, and only this module, whether
//! an actor may act on a resource. Decisions are pure functions of the actor
//! and the hydrated resource graph passed in; nothing here fetches data.
//! Missing associations (owner, team, assignee, project) never match, so the
//! evaluator fails closed.

pub mod filter;
pub mod membership;

pub use filter::{
    accessible_projects, accessible_tasks, count_accessible_tasks_by_status, is_project_visible,
    is_task_visible, AccessFilter,
};
pub use membership::{is_affiliated, merge_owner};

use crate::domain::{Actor, Project, Role, Task, Team};
use crate::error::AppError;
use crate::telemetry::metrics::record_decision;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Create a project, task or team
    ResourceCreate,
    /// Read a single project; same rule as listing
    ProjectView,
    /// Read a single task; same rule as listing
    TaskView,
    /// Attach a project to a new or updated task
    ProjectUse,
    /// Update or delete a project
    ProjectManage,
    /// Update or delete a task
    TaskEdit,
    /// Attach a project to a team
    TeamAttach,
    /// Read a single team with its members
    TeamView,
    TeamUpdate,
    TeamDelete,
    TeamManageMembers,
}

impl PolicyAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyAction::ResourceCreate => "resource_create",
            PolicyAction::ProjectView => "project_view",
            PolicyAction::TaskView => "task_view",
            PolicyAction::ProjectUse => "project_use",
            PolicyAction::ProjectManage => "project_manage",
            PolicyAction::TaskEdit => "task_edit",
            PolicyAction::TeamAttach => "team_attach",
            PolicyAction::TeamView => "team_view",
            PolicyAction::TeamUpdate => "team_update",
            PolicyAction::TeamDelete => "team_delete",
            PolicyAction::TeamManageMembers => "team_manage_members",
        }
    }

    fn denial_message(self) -> &'static str {
        match self {
            PolicyAction::ResourceCreate => "Guests cannot create resources",
            PolicyAction::ProjectView => "Access denied for project",
            PolicyAction::TaskView => "Access denied for task",
            PolicyAction::ProjectUse => "Access denied for project",
            PolicyAction::ProjectManage => {
                "Only the project owner, a team lead of its team, or an admin can modify this project"
            }
            PolicyAction::TaskEdit => "Access denied for task",
            PolicyAction::TeamAttach => "Projects can only be assigned to teams you belong to",
            PolicyAction::TeamView => "Access denied for team",
            PolicyAction::TeamUpdate => "Only team owner or admin can update team",
            PolicyAction::TeamDelete => "Only team owner or admin can delete team",
            PolicyAction::TeamManageMembers => {
                "Only an admin or a team lead of this team can manage its members"
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ResourceScope<'a> {
    Global,
    Project(&'a Project),
    Task(&'a Task),
    Team(&'a Team),
}

impl ResourceScope<'_> {
    fn kind(&self) -> &'static str {
        match self {
            ResourceScope::Global => "global",
            ResourceScope::Project(_) => "project",
            ResourceScope::Task(_) => "task",
            ResourceScope::Team(_) => "team",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub action: PolicyAction,
    pub scope: ResourceScope<'a>,
}

impl<'a> PolicyInput<'a> {
    pub fn new(action: PolicyAction, scope: ResourceScope<'a>) -> Self {
        Self { action, scope }
    }
}

/// Evaluate `input` for `actor`, turning a denial into
/// [`AppError::PermissionDenied`].
pub fn enforce(actor: &Actor, input: &PolicyInput<'_>) -> PolicyResult<()> {
    let allowed = match (input.action, input.scope) {
        (PolicyAction::ResourceCreate, _) => can_create(actor),
        (PolicyAction::ProjectView, ResourceScope::Project(project)) => {
            is_project_visible(actor, project)
        }
        (PolicyAction::TaskView, ResourceScope::Task(task)) => is_task_visible(actor, task),
        (PolicyAction::ProjectUse, ResourceScope::Project(project)) => {
            can_use_project(actor, project)
        }
        (PolicyAction::ProjectManage, ResourceScope::Project(project)) => {
            can_manage_project(actor, project)
        }
        (PolicyAction::TaskEdit, ResourceScope::Task(task)) => can_edit_task(actor, task),
        (PolicyAction::TeamAttach, ResourceScope::Team(team)) => {
            can_attach_to_team(actor, team)
        }
        (PolicyAction::TeamView, ResourceScope::Team(team)) => can_view_team(actor, team),
        (PolicyAction::TeamUpdate, ResourceScope::Team(team)) => can_update_team(actor, team),
        (PolicyAction::TeamDelete, ResourceScope::Team(team)) => can_delete_team(actor, team),
        (PolicyAction::TeamManageMembers, ResourceScope::Team(team)) => {
            can_manage_team_members(actor, team)
        }
        (action, scope) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Policy action {} cannot be evaluated on {} scope",
                action.as_str(),
                scope.kind()
            )))
        }
    };

    record_decision(input.action.as_str(), allowed);

    if allowed {
        tracing::debug!(
            actor_id = %actor.id,
            role = %actor.role,
            action = input.action.as_str(),
            "Access granted"
        );
        Ok(())
    } else {
        tracing::warn!(
            actor_id = %actor.id,
            role = %actor.role,
            action = input.action.as_str(),
            scope = input.scope.kind(),
            "Access denied"
        );
        Err(AppError::PermissionDenied(
            input.action.denial_message().to_string(),
        ))
    }
}

/// Any role but GUEST may create projects, tasks and teams
pub fn can_create(actor: &Actor) -> bool {
    actor.role.can_mutate()
}

/// May `project` be attached to a new or updated task?
///
/// Any affiliation with the project's team suffices, whatever the role.
pub fn can_use_project(actor: &Actor, project: &Project) -> bool {
    if actor.is_admin() {
        return true;
    }
    if actor.is(project.owner_id) {
        return true;
    }
    is_affiliated(actor, project.team.as_ref())
}

/// May `task` be updated or deleted?
pub fn can_edit_task(actor: &Actor, task: &Task) -> bool {
    if actor.is_admin() {
        return true;
    }
    if !actor.role.can_mutate() {
        return false;
    }
    if actor.is(task.assignee_id) {
        return true;
    }
    let Some(project) = task.project.as_ref() else {
        return false;
    };
    if actor.is(project.owner_id) {
        return true;
    }
    is_affiliated(actor, project.team.as_ref())
        && matches!(actor.role, Role::TeamLead | Role::Member)
}

/// May `project` be updated or deleted?
///
/// Narrower than [`can_use_project`]: a plain MEMBER of the team may use the
/// project but not manage it.
pub fn can_manage_project(actor: &Actor, project: &Project) -> bool {
    if actor.is_admin() {
        return true;
    }
    if !actor.role.can_mutate() {
        return false;
    }
    if actor.is(project.owner_id) {
        return true;
    }
    actor.role == Role::TeamLead && is_affiliated(actor, project.team.as_ref())
}

/// May the member list of `team` be replaced?
pub fn can_manage_team_members(actor: &Actor, team: &Team) -> bool {
    if actor.is_admin() {
        return true;
    }
    actor.role == Role::TeamLead && is_affiliated(actor, Some(team))
}

/// May a project be placed under `team`?
pub fn can_attach_to_team(actor: &Actor, team: &Team) -> bool {
    actor.is_admin() || is_affiliated(actor, Some(team))
}

/// Admin or affiliated; guests in the team included
pub fn can_view_team(actor: &Actor, team: &Team) -> bool {
    actor.is_admin() || is_affiliated(actor, Some(team))
}

/// May `team` be renamed or re-described?
pub fn can_update_team(actor: &Actor, team: &Team) -> bool {
    is_team_owner_or_admin(actor, team)
}

pub fn can_delete_team(actor: &Actor, team: &Team) -> bool {
    is_team_owner_or_admin(actor, team)
}

fn is_team_owner_or_admin(actor: &Actor, team: &Team) -> bool {
    actor.is_admin() || (actor.role.can_mutate() && team.owner_id == actor.id)
}
