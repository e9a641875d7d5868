//! Account management service, application-layer orchestration
//!
//! Registration, credential checks, role assignment and record lookup.
//! Transport adapters should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::{
    AuthorityRepositoryInterface, DomainError, DomainResult, PasswordHasher, User, UserId,
    UserRepositoryInterface, UserRole,
};

/// Returned by [`AccountService::get_authority`] when no authority is stored.
pub const UNKNOWN_AUTHORITY: &str = "Your role is unknown";

/// Account service. Orchestrates the user store, the authority store and
/// the password hasher.
///
/// Generic over its collaborators so it stays decoupled from the concrete
/// persistence and crypto layers. Holds no state of its own.
pub struct AccountService<U, A, H>
where
    U: UserRepositoryInterface,
    A: AuthorityRepositoryInterface,
    H: PasswordHasher,
{
    users: Arc<U>,
    authorities: Arc<A>,
    hasher: Arc<H>,
}

impl<U, A, H> AccountService<U, A, H>
where
    U: UserRepositoryInterface,
    A: AuthorityRepositoryInterface,
    H: PasswordHasher,
{
    pub fn new(users: Arc<U>, authorities: Arc<A>, hasher: Arc<H>) -> Self {
        Self {
            users,
            authorities,
            hasher,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check `candidate`'s plaintext password against the stored hash for
    /// its login and return the stored record.
    pub async fn login(&self, candidate: &User) -> DomainResult<User> {
        let stored = self
            .users
            .find_by_login(&candidate.login)
            .await?
            .ok_or_else(|| DomainError::user_not_found("login", &candidate.login))?;

        if !self.hasher.verify(&candidate.password, &stored.password)? {
            warn!(login = %candidate.login, "Login rejected: password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        debug!(login = %stored.login, user_id = ?stored.id, "Login accepted");
        Ok(stored)
    }

    // ── Registration ────────────────────────────────────────────

    /// Persist a brand-new record: hash, assign role, insert, then store
    /// its authority.
    ///
    /// Fails with [`DomainError::Storage`] when the authority store does not
    /// accept the role. The user row then exists without a role; calling
    /// [`save`](Self::save) on it assigns the role again.
    pub async fn register(&self, mut candidate: User, is_admin: bool) -> DomainResult<User> {
        validate(&candidate)?;

        if candidate.id.is_some() {
            return Err(DomainError::InvalidArgument(
                "New user must not carry an ID".into(),
            ));
        }
        if self.users.find_by_login(&candidate.login).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Login '{}' is already taken",
                candidate.login
            )));
        }

        candidate.password = self.hasher.hash(&candidate.password)?;
        candidate.role = Some(UserRole::from_admin_flag(is_admin));

        let user = self.users.create(candidate).await?;

        if !self.authorities.save_authorities(&user).await? {
            warn!(user_id = ?user.id, login = %user.login, "Authority was not stored for new user");
            return Err(DomainError::Storage(format!(
                "Authority not stored for user '{}'",
                user.login
            )));
        }

        info!(user_id = ?user.id, login = %user.login, role = ?user.role, "New user registered");
        Ok(user)
    }

    /// Hash the record's password in place and, for an already persisted
    /// record, assign its role and store the authority.
    ///
    /// `candidate` is mutated: on return its `password` holds the hash, and
    /// for persisted records `role` holds the assigned role. Returns `false`
    /// without touching any store when the record has no nonzero ID.
    pub async fn save(&self, candidate: &mut User, is_admin: bool) -> DomainResult<bool> {
        validate(candidate)?;

        candidate.password = self.hasher.hash(&candidate.password)?;

        if !candidate.is_persisted() {
            debug!(login = %candidate.login, "Save skipped: record is not persisted");
            return Ok(false);
        }

        candidate.role = Some(UserRole::from_admin_flag(is_admin));
        self.authorities.save_authorities(candidate).await
    }

    /// Deletion is not supported; always `false`.
    pub fn delete(&self, _user: &User) -> bool {
        false
    }

    /// Direct authority writes are not supported; always `false`.
    pub fn save_authorities(&self, _user: &User) -> bool {
        false
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_by_id(&self, id: Option<UserId>) -> DomainResult<User> {
        let id = match id {
            None => return Err(DomainError::InvalidArgument("ID cannot be null".into())),
            Some(0) => return Err(DomainError::InvalidArgument("ID cannot be zero".into())),
            Some(id) => id,
        };

        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found("id", id))
    }

    /// Authority string stored for the user, or [`UNKNOWN_AUTHORITY`].
    pub async fn get_authority(&self, id: UserId) -> DomainResult<String> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(DomainError::user_not_found("id", id));
        }

        Ok(self
            .authorities
            .find_authorities_by_user_id(id)
            .await?
            .unwrap_or_else(|| UNKNOWN_AUTHORITY.to_string()))
    }

    pub async fn find_all(&self) -> DomainResult<Vec<User>> {
        self.users.find_all().await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Re-hash the record's password and persist it. The password is
    /// always re-encoded, so callers pass the new plaintext.
    pub async fn update(&self, mut candidate: User) -> DomainResult<User> {
        let Some(id) = candidate.id else {
            return Err(DomainError::InvalidArgument("User ID is null".into()));
        };

        candidate.password = self.hasher.hash(&candidate.password)?;

        let user = self.users.update(candidate).await?;

        info!(user_id = id, "User updated");
        Ok(user)
    }
}

fn validate(user: &User) -> DomainResult<()> {
    user.validate()
        .map_err(|e| DomainError::InvalidArgument(e.to_string()))
}
