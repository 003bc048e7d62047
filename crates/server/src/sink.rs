//! Append-only destinations for accepted reports.
//!
//! A sink receives one fully serialized record per call and must make it
//! visible as a single unit: concurrent appends may land in any order but
//! never interleave, and nothing already written is ever rewritten.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Durable, append-only store for serialized report records.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Append `record` in full. Errors are returned as-is; callers do not retry.
    async fn append(&self, record: &[u8]) -> io::Result<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Appends records to a file, creating it with owner-only permissions.
///
/// The file is reopened for every append so external log rotation takes
/// effect without a restart.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_options() -> tokio::fs::OpenOptions {
        let mut options = tokio::fs::OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(0o600);
        options
    }
}

#[async_trait]
impl ReportSink for FileSink {
    async fn append(&self, record: &[u8]) -> io::Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut file = Self::open_options().open(&self.path).await?;
        file.write_all(record).await?;
        // tokio buffers writes in the background; flush surfaces their errors.
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), bytes = record.len(), "record appended");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
