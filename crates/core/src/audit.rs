//! # Audit Module
//!
//! One entry of the change log. On disk each entry is a single line:
//! `<yyyy-mm-dd HH:MM:SS> - <free text>`.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp layout of an audit line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR: &str = " - ";

/// Timestamped audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl AuditLogEntry {
    /// Entry stamped with the current local time (second precision)
    pub fn now(text: &str) -> Self {
        let now = Local::now().naive_local();
        Self::at(now, text)
    }

    pub fn at(timestamp: NaiveDateTime, text: &str) -> Self {
        // Second precision, so parse_line(to_line(e)) == e
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);

        Self {
            timestamp,
            // Newlines would split one entry across lines
            text: text.replace(['\r', '\n'], " "),
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{}{}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            SEPARATOR,
            self.text
        )
    }

    /// Parse one log line; `None` if the timestamp prefix is malformed
    pub fn parse_line(line: &str) -> Option<Self> {
        let (ts, text) = line.split_once(SEPARATOR)?;
        let timestamp = NaiveDateTime::parse_from_str(ts.trim(), TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            timestamp,
            text: text.to_string(),
        })
    }
}

impl fmt::Display for AuditLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line())
    }
}
