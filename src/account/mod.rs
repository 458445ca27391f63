//! Account system: types, credential hashing and durable storage

pub mod auth;
pub mod store;
pub mod types;

pub use auth::PasswordHasher;
pub use store::AccountStore;
pub use types::{Account, Role};
