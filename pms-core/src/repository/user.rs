//! User repository

use crate::domain::{EntityId, User};
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<User>;
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Users matching `ids`; unknown ids are skipped
    async fn find_all_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>>;
}
