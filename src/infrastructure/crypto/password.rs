//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{DomainError, DomainResult, PasswordHasher};

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt-backed [`PasswordHasher`].
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected on `hash` and
/// never verify, so two passwords sharing a 72-byte prefix are not
/// interchangeable.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::InvalidArgument(format!(
                "Password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        hash_password(plaintext, self.cost)
            .map_err(|e| DomainError::Crypto(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> DomainResult<bool> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        verify_password(plaintext, hashed)
            .map_err(|e| DomainError::Crypto(format!("Failed to verify password: {}", e)))
    }
}
