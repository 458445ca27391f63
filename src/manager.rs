//! Authentication and authorization orchestration
//!
//! `AuthManager` owns the account store, the login throttle, the permission
//! table and the audit log. It is constructed once per process and every
//! operation goes through it; there is no ambient global state.

use std::str::FromStr;

use crate::account::store::AccountStore;
use crate::account::types::{validate_username, Account, Role};
use crate::account::PasswordHasher;
use crate::audit::AuditLog;
use crate::authz::{Action, RoleAuthorizer};
use crate::config::KeyfortConfig;
use crate::error::AuthError;
use crate::throttle::LoginThrottle;

pub struct AuthManager {
    store: AccountStore,
    throttle: LoginThrottle,
    authorizer: RoleAuthorizer,
    audit: AuditLog,
    hasher: PasswordHasher,
    min_password_len: usize,
}

impl AuthManager {
    /// Open the store and audit log at the configured paths. A corrupt
    /// store file fails construction; it is never overwritten here.
    pub fn new(config: &KeyfortConfig) -> Result<Self, AuthError> {
        let store = AccountStore::load(&config.storage.accounts_file)?;
        let hasher = PasswordHasher::new(
            config.security.hash_iterations,
            config.security.hash_memory_kib,
        )?;
        Ok(Self {
            store,
            throttle: LoginThrottle::new(config.security.max_failed_logins),
            authorizer: RoleAuthorizer::new(),
            audit: AuditLog::new(&config.storage.audit_file),
            hasher,
            min_password_len: config.security.min_password_len,
        })
    }

    /// Look up the acting account and check the permission table
    fn require(&self, acting: &str, action: Action) -> Result<(), AuthError> {
        let account = self
            .store
            .find(acting)
            .ok_or_else(|| AuthError::UserNotFound(acting.to_string()))?;
        if self.authorizer.can_perform(account.role, action) {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole)
        }
    }

    pub fn can_perform(&self, role: Role, action: Action) -> bool {
        self.authorizer.can_perform(role, action)
    }

    /// Read-only lookup, used by the shell to refresh its session view
    pub fn account(&self, username: &str) -> Option<Account> {
        self.store.find(username).cloned()
    }

    // ========== Operations ==========

    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.store.contains(username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }
        if password.len() < self.min_password_len {
            return Err(AuthError::WeakPassword(self.min_password_len));
        }
        let hash = self.hasher.hash(password)?;
        self.store.insert(Account::new(username, &hash))?;
        tracing::info!("registered account '{}'", username);
        self.audit.record(username, "registered");
        Ok(())
    }

    /// Create an admin account directly. Bootstrap path for a fresh
    /// install; `register` itself only ever produces `user` accounts.
    pub fn bootstrap_admin(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.store.contains(username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }
        if password.len() < self.min_password_len {
            return Err(AuthError::WeakPassword(self.min_password_len));
        }
        let hash = self.hasher.hash(password)?;
        let mut account = Account::new(username, &hash);
        account.role = Role::Admin;
        self.store.insert(account)?;
        tracing::info!("created admin account '{}'", username);
        self.audit.record(username, "created as admin");
        Ok(())
    }

    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<Account, AuthError> {
        if self.throttle.is_locked(username) {
            return Err(AuthError::TooManyAttempts(username.to_string()));
        }
        let account = self
            .store
            .find(username)
            .cloned()
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        if account.banned {
            return Err(AuthError::AccountBanned(username.to_string()));
        }
        if !self.hasher.verify(password, &account.password_hash) {
            let count = self.throttle.record_failure(username);
            tracing::debug!("failed login for '{}' ({} consecutive)", username, count);
            return Err(AuthError::BadCredentials);
        }
        self.throttle.record_success(username);
        self.audit.record(username, "logged in");
        Ok(account)
    }

    pub fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        let current_hash = self
            .store
            .find(username)
            .map(|a| a.password_hash.clone())
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        if !self.hasher.verify(old_password, &current_hash) {
            return Err(AuthError::BadCredentials);
        }
        if new_password.len() < self.min_password_len {
            return Err(AuthError::WeakPassword(self.min_password_len));
        }
        if self.hasher.verify(new_password, &current_hash) {
            return Err(AuthError::PasswordUnchanged);
        }
        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let hash = self.hasher.hash(new_password)?;
        let account = self
            .store
            .find_mut(username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        account.password_hash = hash;
        self.store.save()?;
        self.audit.record(username, "changed password");
        Ok(())
    }

    pub fn set_role(
        &mut self,
        acting: &str,
        target: &str,
        new_role: &str,
    ) -> Result<Role, AuthError> {
        self.require(acting, Action::SetRole)?;
        let role = Role::from_str(new_role)?;
        let account = self
            .store
            .find_mut(target)
            .ok_or_else(|| AuthError::UserNotFound(target.to_string()))?;
        account.role = role;
        self.store.save()?;
        self.audit
            .record(acting, &format!("set role of '{}' to {}", target, role));
        Ok(role)
    }

    /// Flip the ban flag; returns the new state
    pub fn toggle_ban(&mut self, acting: &str, target: &str) -> Result<bool, AuthError> {
        self.require(acting, Action::BanUser)?;
        let account = self
            .store
            .find_mut(target)
            .ok_or_else(|| AuthError::UserNotFound(target.to_string()))?;
        account.banned = !account.banned;
        let banned = account.banned;
        self.store.save()?;
        let action = if banned {
            format!("banned '{}'", target)
        } else {
            format!("unbanned '{}'", target)
        };
        self.audit.record(acting, &action);
        Ok(banned)
    }

    pub fn delete_account(&mut self, acting: &str, target: &str) -> Result<(), AuthError> {
        self.require(acting, Action::DeleteUser)?;
        self.store.remove(target)?;
        self.audit
            .record(acting, &format!("deleted account '{}'", target));
        Ok(())
    }

    pub fn rename_self(&mut self, acting: &str, new_username: &str) -> Result<(), AuthError> {
        self.require(acting, Action::RenameSelf)?;
        if self.store.contains(new_username) {
            return Err(AuthError::DuplicateUsername(new_username.to_string()));
        }
        validate_username(new_username)?;
        self.store.rename(acting, new_username)?;
        self.audit
            .record(acting, &format!("renamed to '{}'", new_username));
        Ok(())
    }

    /// Hand the vip role to another account. Only an account whose role is
    /// exactly `vip` can gift; the giver drops back to `user` first, so a
    /// self-gift leaves the account vip.
    pub fn gift_vip(&mut self, acting: &str, target: &str) -> Result<(), AuthError> {
        let giver = self
            .store
            .find(acting)
            .ok_or_else(|| AuthError::UserNotFound(acting.to_string()))?;
        if giver.role != Role::Vip {
            return Err(AuthError::InsufficientRole);
        }
        if !self.store.contains(target) {
            return Err(AuthError::UserNotFound(target.to_string()));
        }
        if let Some(account) = self.store.find_mut(acting) {
            account.role = Role::User;
        }
        if let Some(account) = self.store.find_mut(target) {
            account.role = Role::Vip;
        }
        self.store.save()?;
        self.audit
            .record(acting, &format!("gifted vip to '{}'", target));
        Ok(())
    }

    /// Clear a username's failed-login counter. The admin escape hatch for
    /// the otherwise indefinite lockout.
    pub fn unlock_user(&mut self, acting: &str, target: &str) -> Result<(), AuthError> {
        self.require(acting, Action::UnlockUser)?;
        if !self.store.contains(target) {
            return Err(AuthError::UserNotFound(target.to_string()));
        }
        self.throttle.clear(target);
        self.audit.record(acting, &format!("unlocked '{}'", target));
        Ok(())
    }

    pub fn list_accounts(&self, acting: &str) -> Result<Vec<Account>, AuthError> {
        self.require(acting, Action::ViewAllAccounts)?;
        Ok(self.store.accounts().to_vec())
    }

    pub fn audit_tail(&self, acting: &str, lines: usize) -> Result<Vec<String>, AuthError> {
        self.require(acting, Action::ViewAuditLog)?;
        self.audit.tail(lines)
    }
}
