//! Destinations for serialized exports.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Result, StarsError};

/// Where a payload ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedExport {
    pub bytes_written: usize,
    pub location: String,
}

/// Destination for a fully serialized export.
///
/// Sinks receive the complete payload at once; nothing is written before
/// aggregation and serialization have both succeeded.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Store `payload` under `label` (e.g. `stars.csv`).
    async fn persist(&self, payload: &[u8], label: &str) -> Result<PersistedExport>;
}

fn validate_label(label: &str) -> Result<()> {
    if label.is_empty()
        || label == "."
        || label == ".."
        || label.contains(['/', '\\'])
    {
        return Err(StarsError::invalid_input(format!(
            "invalid export file name '{label}'"
        )));
    }
    Ok(())
}

/// Writes exports into a directory, replacing any previous file of the same name.
///
/// The payload goes to a temporary file next to the target and is renamed
/// into place, so readers never see a half-written artifact.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExportSink for FileSink {
    async fn persist(&self, payload: &[u8], label: &str) -> Result<PersistedExport> {
        validate_label(label)?;

        let target = self.dir.join(label);
        let location = target.display().to_string();
        let tmp = self.dir.join(format!(".{label}.partial"));

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StarsError::export(self.dir.display().to_string(), e.to_string()))?;

        tokio::fs::write(&tmp, payload)
            .await
            .map_err(|e| StarsError::export(tmp.display().to_string(), e.to_string()))?;

        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "Failed to remove partial export");
            }
            return Err(StarsError::export(location, e.to_string()));
        }

        tracing::debug!(location = %location, bytes = payload.len(), "Export written");

        Ok(PersistedExport {
            bytes_written: payload.len(),
            location,
        })
    }
}

/// Keeps the latest payload in memory for handing to a client as a download.
#[derive(Debug, Default)]
pub struct MemorySink {
    latest: Mutex<Option<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the stored `(label, payload)`, leaving the sink empty.
    pub fn take(&self) -> Option<(String, Vec<u8>)> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn persist(&self, payload: &[u8], label: &str) -> Result<PersistedExport> {
        validate_label(label)?;

        *self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some((label.to_string(), payload.to_vec()));

        Ok(PersistedExport {
            bytes_written: payload.len(),
            location: format!("memory://{label}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_sink_writes_and_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let persisted = sink.persist(b"[]\n", "stars.json").await.unwrap();

        let target = dir.path().join("stars.json");
        assert_eq!(persisted.bytes_written, 3);
        assert_eq!(persisted.location, target.display().to_string());
        assert_eq!(std::fs::read(&target).unwrap(), b"[]\n");
    }

    #[tokio::test]
    async fn test_file_sink_overwrites_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.persist(b"first export, longer", "stars.csv").await.unwrap();
        sink.persist(b"second", "stars.csv").await.unwrap();

        let target = dir.path().join("stars.csv");
        assert_eq!(std::fs::read(&target).unwrap(), b"second");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("stars.csv")]);
    }

    #[tokio::test]
    async fn test_file_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let sink = FileSink::new(&nested);

        sink.persist(b"x", "stars.json").await.unwrap();
        assert!(nested.join("stars.json").exists());
    }

    #[tokio::test]
    async fn test_file_sink_rejects_path_labels() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        for label in ["", "..", "../stars.json", "sub/stars.json"] {
            let err = sink.persist(b"x", label).await.unwrap_err();
            assert!(matches!(err, StarsError::InvalidInput { .. }), "{label}");
        }
    }

    #[tokio::test]
    async fn test_file_sink_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let sink = FileSink::new(&blocker);

        let err = sink.persist(b"x", "stars.json").await.unwrap_err();
        assert!(matches!(err, StarsError::Export { .. }));
    }

    #[tokio::test]
    async fn test_memory_sink_keeps_latest_payload() {
        let sink = MemorySink::new();

        sink.persist(b"one", "stars.json").await.unwrap();
        let persisted = sink.persist(b"two", "stars.csv").await.unwrap();

        assert_eq!(persisted.location, "memory://stars.csv");
        assert_eq!(persisted.bytes_written, 3);
        assert_eq!(
            sink.take(),
            Some(("stars.csv".to_string(), b"two".to_vec()))
        );
        assert_eq!(sink.take(), None);
    }
}
