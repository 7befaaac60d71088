//! Accumulates interactions and writes them out as a YAML cassette.

use std::io;
use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;

use super::format::{Cassette, Interaction};

/// In-memory cassette for one recording session, written by [`finish`](Self::finish).
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Start a session that will be written to `path`.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            cassette: Cassette {
                name: name.into(),
                recorded_at: Utc::now(),
                commit: commit.into(),
                interactions: Vec::new(),
            },
        }
    }

    /// Append one call. Sequence numbers follow call order.
    pub fn record(&mut self, port: &str, method: &str, input: Value, output: Value) {
        let seq = u64::try_from(self.cassette.interactions.len()).unwrap_or(u64::MAX);
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.to_owned(),
            method: method.to_owned(),
            input,
            output,
        });
    }

    /// Write the cassette, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn finish(self) -> io::Result<PathBuf> {
        let yaml = serde_yaml::to_string(&self.cassette).map_err(io::Error::other)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, yaml)?;
        tracing::debug!(
            path = %self.path.display(),
            interactions = self.cassette.interactions.len(),
            "cassette written"
        );
        Ok(self.path)
    }
}
