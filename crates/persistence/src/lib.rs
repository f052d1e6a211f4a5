//! # Bankdesk Persistence
//!
//! Durable storage for the bank: JSON snapshots of both stores plus an
//! append-only change log.
//!
//! ## Layout
//!
//! ```text
//! data/
//! ├── accounts.json      versioned snapshot of every account
//! ├── loans.json         versioned snapshot of every loan
//! └── bank_changes.log   "<timestamp> - <text>" per line
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bankdesk_persistence::{Storage, StorageConfig};
//!
//! let storage = Storage::open(StorageConfig::new("data"));
//! let loaded = storage.snapshots().load();
//! storage.audit().append("ADD: Account A1 (Alice) created by ADMIN with balance 100.00")?;
//! storage.snapshots().save(&loaded.accounts, &loaded.loans)?;
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod snapshot;

pub use audit::AuditLog;
pub use config::StorageConfig;
pub use error::{PersistenceError, PersistenceResult};
pub use snapshot::{Collection, LoadWarning, LoadedState, SnapshotStore, SNAPSHOT_VERSION};

/// Storage facade - snapshots + change log under one data directory
#[derive(Debug, Clone)]
pub struct Storage {
    config: StorageConfig,
    snapshots: SnapshotStore,
    audit: AuditLog,
}

impl Storage {
    /// Wire up the stores. Nothing touches the disk until load/save/append.
    pub fn open(config: StorageConfig) -> Self {
        let snapshots = SnapshotStore::new(&config);
        let audit = AuditLog::new(config.audit_path());
        Self {
            config,
            snapshots,
            audit,
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }
}
