//! Outbound port for the password-hash primitive

use crate::domain::DomainResult;

/// One-way password transformation used before anything reaches a store.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    /// Check a submitted plaintext against a stored hash.
    fn verify(&self, plaintext: &str, hashed: &str) -> DomainResult<bool>;
}
