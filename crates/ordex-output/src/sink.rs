//! Where generated files go.
//!
//! The order system picks files up from a drop directory. Transport to that
//! directory is abstracted behind [`FileSink`]; a locally mounted drop is
//! served by [`LocalDirSink`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use ordex_model::OutputFile;

use crate::error::{DeliveryError, SinkError};

/// Delivers a batch of files into a destination directory.
pub trait FileSink {
    /// Returns a human-readable confirmation on success.
    fn deliver(&mut self, destination: &str, files: &[OutputFile]) -> Result<String, SinkError>;
}

/// Writes files under `root/destination/`.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    root: PathBuf,
}

impl LocalDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSink for LocalDirSink {
    fn deliver(&mut self, destination: &str, files: &[OutputFile]) -> Result<String, SinkError> {
        let dir = self.root.join(destination.trim_matches('/'));
        fs::create_dir_all(&dir).map_err(|source| SinkError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        for file in files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.bytes).map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;
        }
        Ok(format!("{} file(s) written to {}", files.len(), dir.display()))
    }
}

/// Keeps deliveries in memory. Backs dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub deliveries: Vec<(String, Vec<OutputFile>)>,
    failure: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every delivery with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            deliveries: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl FileSink for MemorySink {
    fn deliver(&mut self, destination: &str, files: &[OutputFile]) -> Result<String, SinkError> {
        if let Some(message) = &self.failure {
            return Err(SinkError::Rejected(message.clone()));
        }
        self.deliveries.push((destination.to_string(), files.to_vec()));
        Ok(format!("{} file(s) kept for {destination}", files.len()))
    }
}

/// Outcome of a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub destination: String,
    pub message: String,
    pub file_count: usize,
}

/// Delivers a whole batch. On failure the files come back in the error.
pub fn deliver_batch(
    sink: &mut dyn FileSink,
    destination: &str,
    files: Vec<OutputFile>,
) -> Result<DeliveryReport, DeliveryError> {
    match sink.deliver(destination, &files) {
        Ok(message) => {
            info!(destination, files = files.len(), "batch delivered");
            Ok(DeliveryReport {
                destination: destination.to_string(),
                message,
                file_count: files.len(),
            })
        }
        Err(err) => {
            warn!(destination, error = %err, "batch delivery failed");
            Err(DeliveryError {
                destination: destination.to_string(),
                message: err.to_string(),
                files,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Vec<OutputFile> {
        vec![
            OutputFile::new("a.csv", b"x".to_vec()),
            OutputFile::new("b.csv", b"y".to_vec()),
        ]
    }

    #[test]
    fn memory_sink_records_deliveries() {
        let mut sink = MemorySink::new();
        let report = deliver_batch(&mut sink, "refonteTest", batch()).unwrap();

        assert_eq!(report.file_count, 2);
        assert_eq!(sink.deliveries.len(), 1);
        assert_eq!(sink.deliveries[0].0, "refonteTest");
    }

    #[test]
    fn failure_returns_files_and_message() {
        let mut sink = MemorySink::failing("530 Login incorrect.");
        let err = deliver_batch(&mut sink, "refonteTest", batch()).unwrap_err();

        assert_eq!(err.message, "530 Login incorrect.");
        assert_eq!(err.files, batch());
        assert!(sink.deliveries.is_empty());
    }
}
