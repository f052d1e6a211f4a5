//! Snapshot store - whole-collection save/load for accounts and loans
//!
//! One JSON file per collection:
//!
//! ```text
//! data/accounts.json   {"version":1,"saved_at":"...","records":[Account, ...]}
//! data/loans.json      {"version":1,"saved_at":"...","records":[Loan, ...]}
//! ```
//!
//! Saves go to `<file>.tmp`, are fsynced, then renamed over the old file, so a
//! failed save never leaves a half-written snapshot behind.

use crate::config::StorageConfig;
use crate::error::{PersistenceError, PersistenceResult};
use bankdesk_core::{AccountStore, CoreResult, LoanStore};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk envelope around one collection
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile<R> {
    version: u32,
    saved_at: DateTime<Utc>,
    records: R,
}

/// Which collection a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Accounts,
    Loans,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Accounts => "accounts",
            Collection::Loans => "loans",
        }
    }
}

/// Non-fatal problem found while loading; the collection starts empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    Missing {
        collection: Collection,
        path: PathBuf,
    },
    Corrupt {
        collection: Collection,
        path: PathBuf,
        reason: String,
        /// Where the unreadable file was moved; `None` if the move failed
        backup: Option<PathBuf>,
    },
}

impl LoadWarning {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadWarning::Corrupt { .. })
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::Missing { collection, path } => write!(
                f,
                "{} snapshot {} not found, starting empty",
                collection.as_str(),
                path.display()
            ),
            LoadWarning::Corrupt {
                collection,
                path,
                reason,
                backup,
            } => {
                write!(
                    f,
                    "{} snapshot {} unreadable ({}), starting empty",
                    collection.as_str(),
                    path.display(),
                    reason
                )?;
                match backup {
                    Some(backup) => write!(f, "; original kept as {}", backup.display()),
                    None => write!(f, "; original could not be moved aside"),
                }
            }
        }
    }
}

/// Result of [`SnapshotStore::load`]
#[derive(Debug, Default)]
pub struct LoadedState {
    pub accounts: AccountStore,
    pub loans: LoanStore,
    pub warnings: Vec<LoadWarning>,
}

/// Durable store for the account and loan collections
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
    accounts_path: PathBuf,
    loans_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            accounts_path: config.accounts_path(),
            loans_path: config.loans_path(),
        }
    }

    pub fn accounts_path(&self) -> &Path {
        &self.accounts_path
    }

    pub fn loans_path(&self) -> &Path {
        &self.loans_path
    }

    /// Load both collections.
    ///
    /// Never fails: a missing or unreadable file yields an empty collection
    /// and a [`LoadWarning`]. An unreadable file is renamed to
    /// `<file>.corrupt-<timestamp>` so the next save cannot overwrite it.
    pub fn load(&self) -> LoadedState {
        let mut state = LoadedState::default();

        match load_collection(&self.accounts_path, AccountStore::from_accounts) {
            Ok(Some(accounts)) => state.accounts = accounts,
            Ok(None) => state.warnings.push(LoadWarning::Missing {
                collection: Collection::Accounts,
                path: self.accounts_path.clone(),
            }),
            Err(reason) => state.warnings.push(quarantine(
                Collection::Accounts,
                &self.accounts_path,
                reason,
            )),
        }

        match load_collection(&self.loans_path, LoanStore::from_loans) {
            Ok(Some(loans)) => state.loans = loans,
            Ok(None) => state.warnings.push(LoadWarning::Missing {
                collection: Collection::Loans,
                path: self.loans_path.clone(),
            }),
            Err(reason) => state.warnings.push(quarantine(
                Collection::Loans,
                &self.loans_path,
                reason,
            )),
        }

        for warning in &state.warnings {
            match warning {
                LoadWarning::Missing { .. } => tracing::info!("{}", warning),
                LoadWarning::Corrupt { .. } => tracing::warn!("{}", warning),
            }
        }
        tracing::debug!(
            accounts = state.accounts.len(),
            loans = state.loans.len(),
            "Snapshot loaded"
        );

        state
    }

    /// Write both collections.
    ///
    /// The in-memory stores are only read, so a failure here never touches
    /// them; the caller decides whether to retry.
    pub fn save(&self, accounts: &AccountStore, loans: &LoanStore) -> PersistenceResult<()> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| PersistenceError::snapshot_io(&self.data_dir, e))?;

        write_collection(&self.accounts_path, accounts.list_all())?;
        write_collection(&self.loans_path, loans.list_all())?;

        tracing::debug!(
            accounts = accounts.len(),
            loans = loans.len(),
            "Snapshot saved"
        );
        Ok(())
    }
}

/// Read a collection and rebuild its store. `Err` carries the reason the
/// file could not be used.
fn load_collection<T, S>(
    path: &Path,
    build: impl FnOnce(Vec<T>) -> CoreResult<S>,
) -> Result<Option<S>, String>
where
    T: DeserializeOwned,
{
    match read_collection::<T>(path) {
        Ok(Some(records)) => build(records).map(Some).map_err(|e| e.to_string()),
        Ok(None) => Ok(None),
        Err(PersistenceError::CorruptSnapshot { reason, .. }) => Err(reason),
        Err(e) => Err(e.to_string()),
    }
}

/// Move an unreadable snapshot out of the way of the next save
fn quarantine(collection: Collection, path: &Path, reason: String) -> LoadWarning {
    let backup = backup_path_for(path, Utc::now());
    let backup = match fs::rename(path, &backup) {
        Ok(()) => Some(backup),
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                backup = %backup.display(),
                error = %e,
                "Failed to move unreadable snapshot aside"
            );
            None
        }
    };

    LoadWarning::Corrupt {
        collection,
        path: path.to_path_buf(),
        reason,
        backup,
    }
}

/// `Ok(None)` when the file does not exist
fn read_collection<T: DeserializeOwned>(path: &Path) -> PersistenceResult<Option<Vec<T>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistenceError::snapshot_io(path, e)),
    };

    let file: SnapshotFile<Vec<T>> =
        serde_json::from_str(&content).map_err(|e| PersistenceError::corrupt(path, e.to_string()))?;

    if file.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::corrupt(
            path,
            format!("unsupported snapshot version {}", file.version),
        ));
    }

    Ok(Some(file.records))
}

fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> PersistenceResult<()> {
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        records,
    };

    let tmp_path = tmp_path_for(path);
    write_synced(&tmp_path, &file)
        .and_then(|_| fs::rename(&tmp_path, path))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            PersistenceError::snapshot_io(path, e)
        })
}

fn write_synced<S: Serialize>(path: &Path, value: &S) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn backup_path_for(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".corrupt-{}", at.format("%Y%m%d%H%M%S%3f")));
    path.with_file_name(name)
}
