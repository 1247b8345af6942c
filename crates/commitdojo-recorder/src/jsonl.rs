//! JSON Lines recorder: one attempt per line, appended to a local file.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use commitdojo_core::error::RecorderError;
use commitdojo_core::traits::{AttemptRecord, AttemptRecorder};

/// Appends attempt records to a `.jsonl` file.
pub struct JsonlRecorder {
    path: PathBuf,
    // Serializes appends so concurrent records never interleave.
    lock: Mutex<()>,
}

impl JsonlRecorder {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl AttemptRecorder for JsonlRecorder {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn record(&self, record: &AttemptRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RecorderError::Io(format!("{}: {e}", parent.display())))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| RecorderError::Io(format!("{}: {e}", self.path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| RecorderError::Io(format!("{}: {e}", self.path.display())))?;
        file.flush()
            .await
            .map_err(|e| RecorderError::Io(e.to_string()))?;

        Ok(())
    }
}
