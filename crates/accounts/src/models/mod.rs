//! Domain models for the account directory.

pub mod user;

pub use user::{NewUser, StoredUser, User, UserChanges};
