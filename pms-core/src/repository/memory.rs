//! In-memory repository backend.
//!
//! Implements every repository trait over one set of tables guarded by a
//! single lock, so a reader always sees a consistent snapshot: a team's
//! member set is never observed half-updated and a task's project and team
//! are hydrated from the same moment. Associations are stored as ids and
//! hydrated on read, the way a SQL backend would join them.

use super::{ProjectRepository, TaskRepository, TeamRepository, UserRepository};
use crate::domain::{
    team_names_match, EntityId, Project, Task, TaskStatus, Team, User, TEAM_NAME_TAKEN,
};
use crate::error::{AppError, Result};
use crate::policy::filter::{
    accessible_projects, accessible_tasks, count_accessible_tasks_by_status, newest_first,
};
use crate::policy::AccessFilter;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ProjectRow {
    /// Stored with `team` cleared
    project: Project,
    team_id: Option<EntityId>,
}

#[derive(Debug, Clone)]
struct TaskRow {
    /// Stored with `project` cleared
    task: Task,
    project_id: Option<EntityId>,
}

impl ProjectRow {
    fn from_project(project: &Project) -> Self {
        let mut project = project.clone();
        let team_id = project.team.take().map(|t| t.id);
        Self { project, team_id }
    }
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        let mut task = task.clone();
        let project_id = task.project.take().map(|p| p.id);
        Self { task, project_id }
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<EntityId, User>,
    teams: HashMap<EntityId, Team>,
    projects: HashMap<EntityId, ProjectRow>,
    tasks: HashMap<EntityId, TaskRow>,
}

impl Tables {
    fn hydrate_project(&self, row: &ProjectRow) -> Project {
        let mut project = row.project.clone();
        project.team = row.team_id.and_then(|id| self.teams.get(&id).cloned());
        project
    }

    fn hydrate_task(&self, row: &TaskRow) -> Task {
        let mut task = row.task.clone();
        task.project = row
            .project_id
            .and_then(|id| self.projects.get(&id))
            .map(|p| self.hydrate_project(p));
        task
    }

    fn check_team_ref(&self, team_id: Option<EntityId>) -> Result<()> {
        match team_id {
            Some(id) if !self.teams.contains_key(&id) => {
                Err(AppError::PreconditionMissing(format!("Team {} not found", id)))
            }
            _ => Ok(()),
        }
    }

    /// Reject `name` when another team already uses it
    fn check_team_name(&self, name: &str, except: EntityId) -> Result<()> {
        let taken = self
            .teams
            .values()
            .any(|t| t.id != except && team_names_match(&t.name, name));
        if taken {
            return Err(AppError::Conflict(TEAM_NAME_TAKEN.to_string()));
        }
        Ok(())
    }

    fn check_project_ref(&self, project_id: Option<EntityId>) -> Result<()> {
        match project_id {
            Some(id) if !self.projects.contains_key(&id) => {
                Err(AppError::PreconditionMissing(format!("Project {} not found", id)))
            }
            _ => Ok(()),
        }
    }
}

/// Shared in-memory store. Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id)
            || tables.users.values().any(|u| u.username == user.username)
        {
            return Err(AppError::Conflict(format!(
                "User '{}' already exists",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn create(&self, team: &Team) -> Result<Team> {
        let mut tables = self.tables.write().await;
        if tables.teams.contains_key(&team.id) {
            return Err(AppError::Conflict(format!("Team {} already exists", team.id)));
        }
        tables.check_team_name(&team.name, team.id)?;
        tables.teams.insert(team.id, team.clone());
        Ok(team.clone())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Team>> {
        Ok(self.tables.read().await.teams.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: EntityId) -> Result<Vec<Team>> {
        let tables = self.tables.read().await;
        let mut teams: Vec<Team> = tables
            .teams
            .values()
            .filter(|t| t.owner_id == user_id || t.member_ids.contains(&user_id))
            .cloned()
            .collect();
        teams.sort_by(|a, b| newest_first(a.created_at, a.id, b.created_at, b.id));
        Ok(teams)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.teams.values().any(|t| team_names_match(&t.name, name)))
    }

    async fn update(&self, team: &Team) -> Result<Team> {
        let mut tables = self.tables.write().await;
        tables.check_team_name(&team.name, team.id)?;
        let stored = tables
            .teams
            .get_mut(&team.id)
            .ok_or_else(|| AppError::PreconditionMissing(format!("Team {} not found", team.id)))?;
        *stored = team.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.teams.remove(&id).is_none() {
            return Err(AppError::PreconditionMissing(format!("Team {} not found", id)));
        }
        // Projects outlive their team and become team-less.
        for row in tables.projects.values_mut() {
            if row.team_id == Some(id) {
                row.team_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, project: &Project) -> Result<Project> {
        let mut tables = self.tables.write().await;
        if tables.projects.contains_key(&project.id) {
            return Err(AppError::Conflict(format!(
                "Project {} already exists",
                project.id
            )));
        }
        let row = ProjectRow::from_project(project);
        tables.check_team_ref(row.team_id)?;
        let hydrated = tables.hydrate_project(&row);
        tables.projects.insert(project.id, row);
        Ok(hydrated)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.get(&id).map(|row| tables.hydrate_project(row)))
    }

    async fn list_accessible(&self, filter: &AccessFilter) -> Result<Vec<Project>> {
        let tables = self.tables.read().await;
        let projects = tables.projects.values().map(|row| tables.hydrate_project(row));
        Ok(accessible_projects(filter, projects))
    }

    async fn update(&self, project: &Project) -> Result<Project> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&project.id) {
            return Err(AppError::PreconditionMissing(format!(
                "Project {} not found",
                project.id
            )));
        }
        let mut row = ProjectRow::from_project(project);
        tables.check_team_ref(row.team_id)?;
        row.project.updated_at = Utc::now();
        let hydrated = tables.hydrate_project(&row);
        tables.projects.insert(project.id, row);
        Ok(hydrated)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.projects.remove(&id).is_none() {
            return Err(AppError::PreconditionMissing(format!("Project {} not found", id)));
        }
        tables.tasks.retain(|_, row| row.project_id != Some(id));
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create(&self, task: &Task) -> Result<Task> {
        let mut tables = self.tables.write().await;
        if tables.tasks.contains_key(&task.id) {
            return Err(AppError::Conflict(format!("Task {} already exists", task.id)));
        }
        let row = TaskRow::from_task(task);
        tables.check_project_ref(row.project_id)?;
        let hydrated = tables.hydrate_task(&row);
        tables.tasks.insert(task.id, row);
        Ok(hydrated)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(&id).map(|row| tables.hydrate_task(row)))
    }

    async fn list_accessible(&self, filter: &AccessFilter) -> Result<Vec<Task>> {
        let tables = self.tables.read().await;
        let tasks = tables.tasks.values().map(|row| tables.hydrate_task(row));
        Ok(accessible_tasks(filter, tasks))
    }

    async fn count_accessible_by_status(
        &self,
        filter: &AccessFilter,
        status: TaskStatus,
    ) -> Result<u64> {
        let tables = self.tables.read().await;
        let candidates: Vec<Task> = tables
            .tasks
            .values()
            .filter(|row| row.task.status == status)
            .map(|row| tables.hydrate_task(row))
            .collect();
        Ok(count_accessible_tasks_by_status(filter, &candidates, status))
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&task.id) {
            return Err(AppError::PreconditionMissing(format!(
                "Task {} not found",
                task.id
            )));
        }
        let mut row = TaskRow::from_task(task);
        tables.check_project_ref(row.project_id)?;
        row.task.updated_at = Utc::now();
        let hydrated = tables.hydrate_task(&row);
        tables.tasks.insert(task.id, row);
        Ok(hydrated)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.tasks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::PreconditionMissing(format!("Task {} not found", id))),
        }
    }
}
