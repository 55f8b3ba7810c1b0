//! Team repository

use crate::domain::{EntityId, Team};
use crate::error::Result;
use async_trait::async_trait;

/// Team persistence.
///
/// Team names are unique ignoring case and surrounding whitespace.
/// `create` and `update` must enforce this atomically with the write and
/// fail with `AppError::Conflict(TEAM_NAME_TAKEN)` on a clash.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, team: &Team) -> Result<Team>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Team>>;
    /// Teams the user owns or belongs to
    async fn list_for_user(&self, user_id: EntityId) -> Result<Vec<Team>>;
    /// Case-insensitive match on the trimmed name
    async fn exists_by_name(&self, name: &str) -> Result<bool>;
    /// Replace the stored team, members included, in one write
    async fn update(&self, team: &Team) -> Result<Team>;
    async fn delete(&self, id: EntityId) -> Result<()>;
}
