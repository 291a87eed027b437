//! Append-only text mirror of the activity log.

use std::io;
use std::path::{Path, PathBuf};

use shared::LogRecord;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum LogFileError {
    #[error("failed to open log file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write log file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One log file shared by every session. Writers are serialised so lines
/// from concurrent requests never interleave.
pub struct LogFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &LogRecord) -> Result<(), LogFileError> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| LogFileError::Open { path: self.path.clone(), source })?;
        file.write_all(record.format_line().as_bytes())
            .await
            .map_err(|source| self.write_error(source))?;
        file.flush().await.map_err(|source| self.write_error(source))
    }

    /// Empties the file, creating it if needed.
    pub async fn truncate(&self) -> Result<(), LogFileError> {
        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&self.path, b"").await.map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: io::Error) -> LogFileError {
        LogFileError::Write { path: self.path.clone(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(component: &str, action: &str, state: Option<&str>) -> LogRecord {
        LogRecord {
            timestamp: "2024-03-01T10:00:00.000Z".into(),
            component: component.into(),
            action: action.into(),
            state: state.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn append_then_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogFile::new(dir.path().join("valve-log.txt"));

        log.append(&record("VacR Ventil", "OPENED", Some("OPEN"))).await.unwrap();
        log.append(&record("User", "pump warm", None)).await.unwrap();

        let text = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(
            text,
            "[2024-03-01T10:00:00.000Z] VacR Ventil: OPENED (OPEN)\n\
             [2024-03-01T10:00:00.000Z] User: pump warm\n"
        );

        log.truncate().await.unwrap();
        assert_eq!(tokio::fs::read_to_string(log.path()).await.unwrap(), "");

        log.append(&record("System", "Logs cleared", None)).await.unwrap();
        let text = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn truncate_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogFile::new(dir.path().join("fresh.txt"));
        log.truncate().await.unwrap();
        assert!(log.path().exists());
    }

    #[tokio::test]
    async fn concurrent_appends_keep_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(LogFile::new(dir.path().join("valve-log.txt")));

        let tasks: Vec<_> = (0..32)
            .map(|index| {
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    log.append(&record("Messung", &format!("run {index}"), None)).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let text = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(text.lines().count(), 32);
        let prefix = "[2024-03-01T10:00:00.000Z] Messung: run ";
        assert!(text.lines().all(|line| line.starts_with(prefix)));
    }

    #[tokio::test]
    async fn open_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogFile::new(dir.path().join("missing").join("valve-log.txt"));
        let error = log.append(&record("A", "b", None)).await.unwrap_err();
        assert!(matches!(error, LogFileError::Open { .. }));
        assert!(error.to_string().contains("missing"));
    }
}
