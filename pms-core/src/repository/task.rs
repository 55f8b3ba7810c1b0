//! Task repository

use crate::domain::{EntityId, Task, TaskStatus};
use crate::error::Result;
use crate::policy::AccessFilter;
use async_trait::async_trait;

/// Tasks are returned with their project, and that project's team, hydrated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &Task) -> Result<Task>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Task>>;
    /// Tasks matching `filter`, newest first
    async fn list_accessible(&self, filter: &AccessFilter) -> Result<Vec<Task>>;
    async fn count_accessible_by_status(
        &self,
        filter: &AccessFilter,
        status: TaskStatus,
    ) -> Result<u64>;
    async fn update(&self, task: &Task) -> Result<Task>;
    async fn delete(&self, id: EntityId) -> Result<()>;
}
