//! Durable account storage
//!
//! Accounts live in a single JSON document that is rewritten in full after
//! every mutation. Records keep their file order across load/save cycles.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::Account;
use crate::error::AuthError;

pub struct AccountStore {
    accounts: Vec<Account>,
    path: PathBuf,
}

impl AccountStore {
    /// Open the store at `path`. A missing file is an empty collection; a
    /// present but unreadable or corrupt file is an error, so a bad store is
    /// never silently replaced.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref().to_path_buf();
        let accounts = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| AuthError::Storage(e.to_string()))?;
            serde_json::from_str(&content).map_err(|e| AuthError::Serialization(e.to_string()))?
        } else {
            Vec::new()
        };
        Ok(Self { accounts, path })
    }

    /// Write the full collection out: serialize to a temp file next to the
    /// real one, then rename over it. Last fully-written file wins.
    pub fn save(&self) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(&self.accounts)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, &content).map_err(|e| AuthError::Storage(e.to_string()))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn find(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.username == username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.find(username).is_some()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Add a new account and persist
    pub fn insert(&mut self, account: Account) -> Result<(), AuthError> {
        if self.contains(&account.username) {
            return Err(AuthError::DuplicateUsername(account.username));
        }
        self.accounts.push(account);
        self.save()
    }

    /// Remove an account and persist. Admin accounts are protected.
    pub fn remove(&mut self, username: &str) -> Result<Account, AuthError> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.username == username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        if self.accounts[index].is_admin() {
            return Err(AuthError::ProtectedAccount(username.to_string()));
        }
        let removed = self.accounts.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Change an account's username and persist
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), AuthError> {
        if self.contains(new_name) {
            return Err(AuthError::DuplicateUsername(new_name.to_string()));
        }
        let account = self
            .find_mut(old_name)
            .ok_or_else(|| AuthError::UserNotFound(old_name.to_string()))?;
        account.username = new_name.to_string();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::types::Role;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AccountStore {
        AccountStore::load(dir.path().join("accounts.json")).unwrap()
    }

    fn account(name: &str) -> Account {
        Account::new(name, "$argon2id$stub")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_fields_and_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.json");

        let mut store = AccountStore::load(&path).unwrap();
        store.insert(account("zeta")).unwrap();
        store.insert(account("alpha")).unwrap();
        let mut admin = account("root_admin");
        admin.role = Role::Admin;
        admin.banned = true;
        store.insert(admin).unwrap();

        let reloaded = AccountStore::load(&path).unwrap();
        assert_eq!(reloaded.accounts(), store.accounts());
        let names: Vec<&str> = reloaded
            .accounts()
            .iter()
            .map(|a| a.username.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "root_admin"]);

        // Saving what was loaded is byte-for-byte identical on disk
        let before = fs::read_to_string(&path).unwrap();
        reloaded.save().unwrap();
        let after = fs::read_to_string(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.insert(account("bob")).unwrap();
        assert!(matches!(
            store.insert(account("bob")),
            Err(AuthError::DuplicateUsername(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.insert(account("bob")).unwrap();
        let mut admin = account("boss");
        admin.role = Role::Admin;
        store.insert(admin).unwrap();

        assert!(matches!(
            store.remove("ghost"),
            Err(AuthError::UserNotFound(_))
        ));
        assert!(matches!(
            store.remove("boss"),
            Err(AuthError::ProtectedAccount(_))
        ));
        assert_eq!(store.remove("bob").unwrap().username, "bob");
        assert!(!store.contains("bob"));
    }

    #[test]
    fn test_rename() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.insert(account("bob")).unwrap();
        store.insert(account("carol")).unwrap();

        assert!(matches!(
            store.rename("bob", "carol"),
            Err(AuthError::DuplicateUsername(_))
        ));
        assert!(matches!(
            store.rename("ghost", "dave"),
            Err(AuthError::UserNotFound(_))
        ));

        store.rename("bob", "bobby").unwrap();
        assert!(store.contains("bobby"));
        assert!(!store.contains("bob"));
    }

    #[test]
    fn test_corrupt_file_errors_and_survives() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(&path, "{ this is not json").unwrap();

        assert!(matches!(
            AccountStore::load(&path),
            Err(AuthError::Serialization(_))
        ));
        // The bad file is untouched for manual recovery
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");
    }
}
