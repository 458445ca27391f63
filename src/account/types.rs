//! Account type definitions

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Minimum username length accepted by rename
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum username length accepted by rename
pub const USERNAME_MAX_LEN: usize = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Vip,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Vip => write!(f, "vip"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "vip" => Ok(Role::Vip),
            "admin" => Ok(Role::Admin),
            _ => Err(AuthError::InvalidRole(s.to_string())),
        }
    }
}

/// A stored identity: credential hash, role and ban status
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
    pub username: String,
    /// Argon2id PHC string, never a plaintext password
    #[serde(rename = "password")]
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub banned: bool,
}

impl Account {
    /// Fresh account as produced by registration
    pub fn new(username: &str, password_hash: &str) -> Self {
        Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::User,
            banned: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Username rule enforced on rename: 3-20 chars from [A-Za-z0-9_].
/// Registration deliberately skips this check.
pub fn validate_username(name: &str) -> Result<(), AuthError> {
    let ok_len = (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&name.len());
    let ok_chars = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok_len && ok_chars {
        Ok(())
    } else {
        Err(AuthError::InvalidUsername(name.to_string()))
    }
}
