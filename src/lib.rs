//! # Account Service
//!
//! User-account management core: registration with password hashing,
//! credential verification, role assignment, lookup and update of user
//! records.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: User entity, roles and the store / hasher ports
//! - **application**: `AccountService`, the account use cases
//! - **infrastructure**: SeaORM and in-memory stores, bcrypt hasher
//! - **runtime**: configuration-driven bootstrap and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod runtime;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{AccountService, UNKNOWN_AUTHORITY};
pub use domain::{DomainError, DomainResult, User, UserId, UserRole};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

pub use runtime::{init_tracing, AccountRuntime, RuntimeOptions};
