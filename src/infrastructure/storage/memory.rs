//! In-memory storage implementation

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    AuthorityRepositoryInterface, DomainError, DomainResult, User, UserId,
    UserRepositoryInterface,
};

/// In-memory user and authority storage for development and testing
///
/// Roles are not kept on the user rows; reads resolve them from the
/// authority map, the same way the database store does.
pub struct InMemoryStorage {
    users: DashMap<UserId, User>,
    /// Login → id. Logins are claimed here before a row is written.
    logins: DashMap<String, UserId>,
    authorities: DashMap<UserId, String>,
    user_counter: AtomicI64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            logins: DashMap::new(),
            authorities: DashMap::new(),
            user_counter: AtomicI64::new(1),
        }
    }

    fn with_role(&self, mut user: User) -> User {
        user.role = user
            .id
            .and_then(|id| self.authorities.get(&id))
            .and_then(|a| a.value().parse().ok());
        user
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryStorage {
    async fn create(&self, mut user: User) -> DomainResult<User> {
        let id = match self.logins.entry(user.login.clone()) {
            Entry::Occupied(_) => return Err(login_taken(&user.login)),
            Entry::Vacant(slot) => {
                let id = self.user_counter.fetch_add(1, Ordering::SeqCst);
                slot.insert(id);
                id
            }
        };
        user.id = Some(id);

        let mut row = user.clone();
        row.role = None;
        self.users.insert(id, row);

        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.logins.get(login).map(|id| *id.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let user = self.users.get(&id).map(|u| u.value().clone());
        Ok(user.map(|u| self.with_role(u)))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users.into_iter().map(|u| self.with_role(u)).collect())
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let id = user
            .id
            .ok_or_else(|| DomainError::InvalidArgument("User ID is null".into()))?;

        let Some(current_login) = self.users.get(&id).map(|u| u.login.clone()) else {
            return Err(DomainError::user_not_found("id", id));
        };
        let renamed = current_login != user.login;

        if renamed {
            match self.logins.entry(user.login.clone()) {
                Entry::Occupied(_) => return Err(login_taken(&user.login)),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        let Some(mut row) = self.users.get_mut(&id) else {
            if renamed {
                self.logins.remove(&user.login);
            }
            return Err(DomainError::user_not_found("id", id));
        };
        row.login = user.login.clone();
        row.password = user.password.clone();
        drop(row);

        if renamed {
            self.logins.remove_if(&current_login, |_, owner| *owner == id);
        }

        Ok(self.with_role(user))
    }
}

fn login_taken(login: &str) -> DomainError {
    DomainError::Conflict(format!("Login '{}' is already taken", login))
}

#[async_trait]
impl AuthorityRepositoryInterface for InMemoryStorage {
    async fn save_authorities(&self, user: &User) -> DomainResult<bool> {
        let (Some(id), Some(role)) = (user.id, user.role) else {
            return Ok(false);
        };
        if !self.users.contains_key(&id) {
            return Ok(false);
        }

        self.authorities.insert(id, role.as_authority().to_string());
        Ok(true)
    }

    async fn find_authorities_by_user_id(&self, id: UserId) -> DomainResult<Option<String>> {
        Ok(self.authorities.get(&id).map(|a| a.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::UserRole;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let storage = InMemoryStorage::new();

        let alice = storage.create(User::new("alice", "h1")).await.unwrap();
        let bob = storage.create(User::new("bob", "h2")).await.unwrap();

        assert_eq!(alice.id, Some(1));
        assert_eq!(bob.id, Some(2));
        assert_eq!(storage.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_login() {
        let storage = InMemoryStorage::new();
        storage.create(User::new("alice", "h1")).await.unwrap();

        let err = storage.create(User::new("alice", "h2")).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_role_is_resolved_from_authorities() {
        let storage = InMemoryStorage::new();
        let mut alice = storage.create(User::new("alice", "h1")).await.unwrap();

        let found = storage.find_by_login("alice").await.unwrap().unwrap();
        assert_eq!(found.role, None);

        alice.role = Some(UserRole::Admin);
        assert!(storage.save_authorities(&alice).await.unwrap());

        let found = storage.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.role, Some(UserRole::Admin));
        assert_eq!(
            storage.find_authorities_by_user_id(1).await.unwrap().as_deref(),
            Some("ROLE_ADMIN")
        );
    }

    #[tokio::test]
    async fn test_save_authorities_requires_known_user_and_role() {
        let storage = InMemoryStorage::new();

        let ghost = User {
            id: Some(9),
            login: "ghost".into(),
            password: "h".into(),
            role: Some(UserRole::User),
        };
        assert!(!storage.save_authorities(&ghost).await.unwrap());

        let alice = storage.create(User::new("alice", "h1")).await.unwrap();
        assert!(!storage.save_authorities(&alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_password() {
        let storage = InMemoryStorage::new();
        let mut alice = storage.create(User::new("alice", "h1")).await.unwrap();

        alice.password = "h2".into();
        storage.update(alice).await.unwrap();

        let found = storage.find_by_login("alice").await.unwrap().unwrap();
        assert_eq!(found.password, "h2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_claim_login_once() {
        let storage = Arc::new(InMemoryStorage::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage.create(User::new("alice", format!("h{}", i))).await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, DomainError::Conflict(_))),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(storage.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_releases_old_login() {
        let storage = InMemoryStorage::new();
        let mut alice = storage.create(User::new("alice", "h1")).await.unwrap();
        storage.create(User::new("bob", "h2")).await.unwrap();

        let mut taken = alice.clone();
        taken.login = "bob".into();
        assert!(matches!(
            storage.update(taken).await,
            Err(DomainError::Conflict(_))
        ));

        alice.login = "alicia".into();
        storage.update(alice).await.unwrap();

        assert!(storage.find_by_login("alice").await.unwrap().is_none());
        assert_eq!(
            storage.find_by_login("alicia").await.unwrap().unwrap().id,
            Some(1)
        );
        storage.create(User::new("alice", "h3")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_user_fails() {
        let storage = InMemoryStorage::new();

        let err = storage
            .update(User::new("alice", "h1").with_id(3))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
