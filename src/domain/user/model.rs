use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Store-assigned primary key of a user record.
pub type UserId = i64;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Role granted at creation time for the caller-supplied admin flag.
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Authority string persisted by the authority store.
    pub fn as_authority(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_authority())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Self::User),
            "ROLE_ADMIN" => Ok(Self::Admin),
            other => Err(format!("Unknown authority: {}", other)),
        }
    }
}

/// User model
///
/// `password` holds plaintext while the record is being built by a caller
/// and the bcrypt hash once it has passed through the account service.
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct User {
    pub id: Option<UserId>,
    #[validate(length(min = 1, message = "Login must not be empty"))]
    pub login: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub role: Option<UserRole>,
}

impl User {
    /// A fresh, unpersisted record carrying a plaintext password.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            login: login.into(),
            password: password.into(),
            role: None,
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// True when the record carries a nonzero store-assigned identifier.
    pub fn is_persisted(&self) -> bool {
        matches!(self.id, Some(id) if id != 0)
    }
}
