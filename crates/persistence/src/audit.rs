//! Audit log - append-only change log
//!
//! Plain text, one entry per line (`<timestamp> - <text>`). Every append is
//! flushed and fsynced before returning, independently of snapshot saves, so
//! the trail survives a crash between a mutation and the next save.

use crate::error::{PersistenceError, PersistenceResult};
use bankdesk_core::AuditLogEntry;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-only change log backed by a single file
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp `text` and append it durably
    pub fn append(&self, text: &str) -> PersistenceResult<AuditLogEntry> {
        let entry = AuditLogEntry::now(text);
        self.append_entry(&entry)?;
        Ok(entry)
    }

    /// Append a pre-built entry durably
    pub fn append_entry(&self, entry: &AuditLogEntry) -> PersistenceResult<()> {
        let io_err = |e| PersistenceError::audit_io(&self.path, e);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{}", entry.to_line()).map_err(io_err)?;
        file.sync_data().map_err(io_err)?;

        tracing::debug!(entry = %entry.text, "Audit entry appended");
        Ok(())
    }

    /// All entries in insertion order. Lines that do not parse are skipped.
    pub fn entries(&self) -> PersistenceResult<Vec<AuditLogEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::audit_io(&self.path, e)),
        };

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| PersistenceError::audit_io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            match AuditLogEntry::parse_line(&line) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(line = idx + 1, "Skipping malformed audit line"),
            }
        }

        Ok(entries)
    }

    /// Irreversibly truncate the whole log
    pub fn clear(&self) -> PersistenceResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(PersistenceError::audit_io(&self.path, e)),
        }
        tracing::info!(path = %self.path.display(), "Audit log cleared");
        Ok(())
    }
}
