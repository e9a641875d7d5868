//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories.

pub mod authority_repository;
pub mod user_repository;

pub use authority_repository::AuthorityRepository;
pub use user_repository::UserRepository;
