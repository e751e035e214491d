//! External sink for serialized scene documents.
//!
//! The hand-off is the only asynchronous step of a generation and may fail
//! on its own; callers keep the serialized text either way.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, ScenegenError};

/// Destination of a generated document, e.g. a clipboard or a file.
#[async_trait]
pub trait Sink: Send {
    async fn write(&mut self, text: &str) -> Result<()>;
}

#[async_trait]
impl<K: Sink + ?Sized> Sink for Box<K> {
    async fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text).await
    }
}

/// Records every write. Can be switched to reject writes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every write fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            writes: Arc::default(),
            failure: Some(reason.into()),
        }
    }

    pub fn set_failure(&mut self, reason: Option<String>) {
        self.failure = reason;
    }

    /// Texts written so far, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write(&mut self, text: &str) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(ScenegenError::SinkWrite {
                reason: reason.clone(),
            });
        }
        let mut writes = self.writes.lock().map_err(|_| ScenegenError::SinkWrite {
            reason: "memory sink lock poisoned".to_string(),
        })?;
        writes.push(text.to_string());
        Ok(())
    }
}

/// Writes documents to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl Sink for StdoutSink {
    async fn write(&mut self, text: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let sink_error = |e: std::io::Error| ScenegenError::SinkWrite {
            reason: e.to_string(),
        };
        stdout.write_all(text.as_bytes()).await.map_err(sink_error)?;
        stdout.write_all(b"\n").await.map_err(sink_error)?;
        stdout.flush().await.map_err(sink_error)
    }
}

/// Writes each document to a file, replacing its previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write(&mut self, text: &str) -> Result<()> {
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| ScenegenError::SinkWrite {
                reason: format!("{}: {}", self.path.display(), e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_sink_records_writes() {
        let mut sink = MemorySink::new();
        let observer = sink.clone();
        sink.write("one").await.unwrap();
        sink.write("two").await.unwrap();
        assert_eq!(observer.writes(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_failing_sink_rejects() {
        let mut sink = MemorySink::failing("clipboard denied");
        let err = sink.write("doc").await.unwrap_err();
        assert!(matches!(err, ScenegenError::SinkWrite { .. }));
        assert!(sink.writes().is_empty());
    }

    #[tokio::test]
    async fn test_file_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scene.excalidraw");
        let mut sink = FileSink::new(&path);
        sink.write("{}").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_file_sink_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("missing").join("scene.json"));
        let err = sink.write("{}").await.unwrap_err();
        assert_eq!(err.error_code(), "SINK_WRITE");
    }
}
