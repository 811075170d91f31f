use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::AuditEntry;

/// Append-only newline-delimited JSON sink for command audit records.
///
/// Single writer per process. Each append is one self-contained compact
/// line so the log replays record by record. The destination directory is
/// created on first use; a failed append surfaces to the caller, which
/// treats it as fatal for the hosting loop.
pub struct AuditService {
    log_path: PathBuf,
}

impl AuditService {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn append(&self, entry: &AuditEntry) -> io::Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(&line)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
