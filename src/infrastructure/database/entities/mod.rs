//! Database entities module

pub mod authority;
pub mod user;

pub use authority::Entity as Authority;
pub use user::Entity as User;
