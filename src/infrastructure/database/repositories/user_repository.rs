use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, User, UserId, UserRepositoryInterface};
use crate::infrastructure::database::entities::{authority, user};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn authority_of(&self, user_id: i64) -> DomainResult<Option<authority::Model>> {
        authority::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model, authority: Option<authority::Model>) -> User {
    User {
        id: Some(model.id),
        login: model.login,
        password: model.password,
        role: authority.and_then(|a| a.authority.parse().ok()),
    }
}

pub(super) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn write_err(e: sea_orm::DbErr, login: &str) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict(format!("Login '{}' is already taken", login))
    } else {
        db_err(e)
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create(&self, mut user: User) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: NotSet,
            login: Set(user.login.clone()),
            password: Set(user.password.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, &user.login))?;

        user.id = Some(model.id);
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let row = user::Entity::find()
            .filter(user::Column::Login.eq(login))
            .find_also_related(authority::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(|(model, authority)| user_model_to_domain(model, authority)))
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let row = user::Entity::find_by_id(id)
            .find_also_related(authority::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(|(model, authority)| user_model_to_domain(model, authority)))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let rows = user::Entity::find()
            .find_also_related(authority::Entity)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(model, authority)| user_model_to_domain(model, authority))
            .collect())
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let id = user
            .id
            .ok_or_else(|| DomainError::InvalidArgument("User ID is null".into()))?;

        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::user_not_found("id", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.login = Set(user.login.clone());
        active.password = Set(user.password.clone());
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, &user.login))?;

        let authority = self.authority_of(id).await?;
        Ok(user_model_to_domain(updated, authority))
    }
}
