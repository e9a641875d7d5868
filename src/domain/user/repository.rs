use async_trait::async_trait;

use super::{User, UserId};
use crate::domain::DomainResult;

/// Persistence port for user records.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a new record. The store assigns the identifier and returns
    /// the persisted copy.
    async fn create(&self, user: User) -> DomainResult<User>;

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;
    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>>;
    async fn find_all(&self) -> DomainResult<Vec<User>>;

    async fn update(&self, user: User) -> DomainResult<User>;
}
