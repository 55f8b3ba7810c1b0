//! Application state for dependency injection
//!
//! Callers (an HTTP layer, integration tests) depend on [`HasServices`]
//! rather than on a concrete storage backend.

use crate::config::Config;
use crate::repository::{
    InMemoryStore, ProjectRepository, TaskRepository, TeamRepository, UserRepository,
};
use crate::service::{ProjectService, TaskService, TeamService};
use std::sync::Arc;

/// Access to every service the application exposes.
pub trait HasServices: Clone + Send + Sync + 'static {
    type UserRepo: UserRepository;
    type TeamRepo: TeamRepository;
    type ProjectRepo: ProjectRepository;
    type TaskRepo: TaskRepository;

    fn config(&self) -> &Config;

    fn user_repo(&self) -> &Self::UserRepo;

    fn team_service(&self) -> &TeamService<Self::TeamRepo, Self::UserRepo>;

    fn project_service(&self) -> &ProjectService<Self::ProjectRepo, Self::TeamRepo>;

    fn task_service(&self) -> &TaskService<Self::TaskRepo, Self::ProjectRepo, Self::UserRepo>;
}

/// State backed by a single shared [`InMemoryStore`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: InMemoryStore,
    pub team_service: Arc<TeamService<InMemoryStore, InMemoryStore>>,
    pub project_service: Arc<ProjectService<InMemoryStore, InMemoryStore>>,
    pub task_service: Arc<TaskService<InMemoryStore, InMemoryStore, InMemoryStore>>,
}

impl AppState {
    pub fn in_memory(config: Config) -> Self {
        let store = InMemoryStore::new();
        let repo = Arc::new(store.clone());
        Self {
            config: Arc::new(config),
            team_service: Arc::new(TeamService::new(repo.clone(), repo.clone())),
            project_service: Arc::new(ProjectService::new(repo.clone(), repo.clone())),
            task_service: Arc::new(TaskService::new(repo.clone(), repo.clone(), repo)),
            store,
        }
    }
}

impl HasServices for AppState {
    type UserRepo = InMemoryStore;
    type TeamRepo = InMemoryStore;
    type ProjectRepo = InMemoryStore;
    type TaskRepo = InMemoryStore;

    fn config(&self) -> &Config {
        &self.config
    }

    fn user_repo(&self) -> &InMemoryStore {
        &self.store
    }

    fn team_service(&self) -> &TeamService<InMemoryStore, InMemoryStore> {
        &self.team_service
    }

    fn project_service(&self) -> &ProjectService<InMemoryStore, InMemoryStore> {
        &self.project_service
    }

    fn task_service(&self) -> &TaskService<InMemoryStore, InMemoryStore, InMemoryStore> {
        &self.task_service
    }
}
