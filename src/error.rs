use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("account '{0}' is banned")]
    AccountBanned(String),
    #[error("wrong login or password")]
    BadCredentials,
    #[error("too many failed attempts for '{0}', ask an admin to unlock")]
    TooManyAttempts(String),
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),
    #[error("invalid username '{0}': 3-20 characters, letters, digits and underscore only")]
    InvalidUsername(String),
    #[error("invalid role: {0}. Allowed: user, vip, admin")]
    InvalidRole(String),
    #[error("new passwords do not match")]
    PasswordMismatch,
    #[error("new password must differ from the current one")]
    PasswordUnchanged,
    #[error("insufficient privileges")]
    InsufficientRole,
    #[error("admin account '{0}' cannot be deleted")]
    ProtectedAccount(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}
