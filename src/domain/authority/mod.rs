//! Authority aggregate

pub mod repository;

pub use repository::AuthorityRepositoryInterface;
