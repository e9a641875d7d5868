use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::debug;

use super::user_repository::db_err;
use crate::domain::{AuthorityRepositoryInterface, DomainResult, User, UserId};
use crate::infrastructure::database::entities::{authority, user};

pub struct AuthorityRepository {
    db: DatabaseConnection,
}

impl AuthorityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorityRepositoryInterface for AuthorityRepository {
    async fn save_authorities(&self, user: &User) -> DomainResult<bool> {
        let (Some(id), Some(role)) = (user.id, user.role) else {
            return Ok(false);
        };

        let owner = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if owner.is_none() {
            debug!(user_id = id, "Authority not saved: unknown user");
            return Ok(false);
        }

        let existing = authority::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match existing {
            Some(existing) => {
                let mut active: authority::ActiveModel = existing.into();
                active.authority = Set(role.as_authority().to_string());
                active.update(&self.db).await.map_err(db_err)?;
            }
            None => {
                authority::ActiveModel {
                    user_id: Set(id),
                    authority: Set(role.as_authority().to_string()),
                }
                .insert(&self.db)
                .await
                .map_err(db_err)?;
            }
        }

        Ok(true)
    }

    async fn find_authorities_by_user_id(&self, id: UserId) -> DomainResult<Option<String>> {
        let model = authority::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(|a| a.authority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserRepositoryInterface, UserRole};
    use crate::infrastructure::database::repositories::UserRepository;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn test_save_then_overwrite_authority() {
        let db = test_database().await;
        let users = UserRepository::new(db.clone());
        let repo = AuthorityRepository::new(db);

        let mut alice = users.create(User::new("alice", "h")).await.unwrap();
        let id = alice.id.unwrap();
        assert_eq!(repo.find_authorities_by_user_id(id).await.unwrap(), None);

        alice.role = Some(UserRole::User);
        assert!(repo.save_authorities(&alice).await.unwrap());
        assert_eq!(
            repo.find_authorities_by_user_id(id).await.unwrap().as_deref(),
            Some("ROLE_USER")
        );

        alice.role = Some(UserRole::Admin);
        assert!(repo.save_authorities(&alice).await.unwrap());
        assert_eq!(
            repo.find_authorities_by_user_id(id).await.unwrap().as_deref(),
            Some("ROLE_ADMIN")
        );
    }

    #[tokio::test]
    async fn test_save_for_unknown_or_roleless_user_is_false() {
        let db = test_database().await;
        let repo = AuthorityRepository::new(db);

        let mut ghost = User::new("ghost", "h").with_id(12);
        assert!(!repo.save_authorities(&ghost).await.unwrap());

        ghost.role = Some(UserRole::User);
        assert!(!repo.save_authorities(&ghost).await.unwrap());
    }
}
