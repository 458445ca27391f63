//! Append-only audit trail
//!
//! One line per security-relevant action: RFC 3339 timestamp, actor and a
//! free-text description, tab-separated. The log never truncates and a write
//! failure never fails the operation being audited.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::error::AuthError;

pub const AUDIT_DELIMITER: char = '\t';

pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one entry. Failures are swallowed and reported on the
    /// observability channel instead of propagating to the caller.
    pub fn record(&self, actor: &str, action: &str) {
        if let Err(e) = self.append(actor, action) {
            tracing::warn!("audit log write failed: {}", e);
        }
    }

    fn append(&self, actor: &str, action: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{}{}{}{}{}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            AUDIT_DELIMITER,
            actor,
            AUDIT_DELIMITER,
            action
        )
    }

    /// Last `n` raw lines, oldest first
    pub fn tail(&self, n: usize) -> Result<Vec<String>, AuthError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| AuthError::Storage(e.to_string()))?;
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].to_vec())
    }
}
