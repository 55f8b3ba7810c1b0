//! Project repository

use crate::domain::{EntityId, Project};
use crate::error::Result;
use crate::policy::AccessFilter;
use async_trait::async_trait;

/// Projects are returned with their team hydrated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> Result<Project>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Project>>;
    /// Projects matching `filter`, newest first
    async fn list_accessible(&self, filter: &AccessFilter) -> Result<Vec<Project>>;
    async fn update(&self, project: &Project) -> Result<Project>;
    /// Deletes the project and its tasks
    async fn delete(&self, id: EntityId) -> Result<()>;
}
