//! Debug dumps of raw arrivals/departures responses.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::StopId;

/// Writes raw API responses to `{dir}/{stop_id}.json`.
///
/// Each dump overwrites the previous one for the same stop. Failures are
/// logged and swallowed: a dump must never fail the lookup it records.
#[derive(Debug, Clone)]
pub struct DebugDump {
    dir: PathBuf,
}

impl DebugDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the dump for `stop` is written to.
    pub fn path_for(&self, stop: &StopId) -> PathBuf {
        self.dir.join(format!("{}.json", stop.as_str()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `raw` for `stop`, creating the directory if needed.
    pub async fn write(&self, stop: &StopId, raw: &Value) {
        if let Err(e) = self.try_write(stop, raw).await {
            warn!(stop = %stop, error = %e, "failed to write debug dump");
        }
    }

    async fn try_write(&self, stop: &StopId, raw: &Value) -> std::io::Result<()> {
        if !self.dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&self.dir).await?;
        }

        let json = serde_json::to_string_pretty(raw)?;
        let path = self.path_for(stop);
        tokio::fs::write(&path, json).await?;

        debug!(path = %path.display(), "wrote debug dump");
        Ok(())
    }
}
