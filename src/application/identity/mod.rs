//! Identity module: account management & authentication
//!
//! Contains the `AccountService` which orchestrates the account use-cases:
//! registration, login, role assignment, lookups and password rotation.

pub mod service;

pub use service::{AccountService, UNKNOWN_AUTHORITY};
