//! Storage configuration
//!
//! Where the snapshots and the change log live. Every field has a serde
//! default, so a partial JSON file (or none at all) is enough.

use crate::error::{PersistenceError, PersistenceResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding every durable file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Account snapshot file name
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,

    /// Loan snapshot file name
    #[serde(default = "default_loans_file")]
    pub loans_file: String,

    /// Change log file name
    #[serde(default = "default_audit_file")]
    pub audit_file: String,

    /// Save the snapshot after every committed mutation
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_loans_file() -> String {
    "loans.json".to_string()
}

fn default_audit_file() -> String {
    "bank_changes.log".to_string()
}

fn default_autosave() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            accounts_file: default_accounts_file(),
            loans_file: default_loans_file(),
            audit_file: default_audit_file(),
            autosave: default_autosave(),
        }
    }
}

impl StorageConfig {
    /// Defaults rooted at `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PersistenceError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PersistenceError::Configuration(format!("invalid config {}: {}", path.display(), e))
        })
    }

    /// Defaults overlaid with `BANKDESK_DATA_DIR` and `BANKDESK_AUTOSAVE`
    pub fn from_env() -> PersistenceResult<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment-style overrides from any lookup function
    pub fn with_env_overrides<F>(mut self, lookup: F) -> PersistenceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("BANKDESK_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("BANKDESK_AUTOSAVE") {
            self.autosave = parse_bool(&flag).ok_or_else(|| {
                PersistenceError::Configuration(format!("BANKDESK_AUTOSAVE: not a boolean: {}", flag))
            })?;
        }
        Ok(self)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.accounts_file)
    }

    pub fn loans_path(&self) -> PathBuf {
        self.data_dir.join(&self.loans_file)
    }

    pub fn audit_path(&self) -> PathBuf {
        self.data_dir.join(&self.audit_file)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
