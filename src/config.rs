use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KeyfortConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Minimum accepted password length
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
    /// Consecutive failures before a username is locked out
    #[serde(default = "default_max_failed_logins")]
    pub max_failed_logins: u32,
    /// Argon2id time cost
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2id memory cost in KiB
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_audit_file() -> String {
    "audit.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_password_len() -> usize {
    6
}

fn default_max_failed_logins() -> u32 {
    3
}

fn default_hash_iterations() -> u32 {
    3
}

fn default_hash_memory_kib() -> u32 {
    19456
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            accounts_file: default_accounts_file(),
            audit_file: default_audit_file(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
            max_failed_logins: default_max_failed_logins(),
            hash_iterations: default_hash_iterations(),
            hash_memory_kib: default_hash_memory_kib(),
        }
    }
}

impl Default for KeyfortConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl KeyfortConfig {
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("Error parsing config: {}. Using defaults.", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading config: {}. Using defaults.", e);
                    Self::default()
                }
            }
        } else {
            let config = Self::default();
            if let Ok(s) = toml::to_string_pretty(&config) {
                let _ = std::fs::write(path, s);
            }
            config
        }
    }
}
