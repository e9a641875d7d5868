use async_trait::async_trait;

use crate::domain::{DomainResult, User, UserId};

/// Persistence port for the authority string held per user.
#[async_trait]
pub trait AuthorityRepositoryInterface: Send + Sync {
    /// Store `user.role` as the authority of `user.id`.
    ///
    /// Returns `false` when the record has no identifier, no role, or does
    /// not refer to a stored user.
    async fn save_authorities(&self, user: &User) -> DomainResult<bool>;

    async fn find_authorities_by_user_id(&self, id: UserId) -> DomainResult<Option<String>>;
}
