pub mod authority;
pub mod ports;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use authority::AuthorityRepositoryInterface;
pub use ports::PasswordHasher;
pub use repositories::DomainResult;
pub use user::{User, UserId, UserRepositoryInterface, UserRole};

pub use crate::shared::errors::DomainError;
