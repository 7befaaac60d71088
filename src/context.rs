//! Service context that bundles all port trait objects.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{Config, API_KEY_ENV_VARS};
use crate::error::StudioError;
use crate::ports::ImageGenerator;

/// Environment variable naming a cassette to replay instead of calling the API.
pub const REPLAY_ENV_VAR: &str = "STUDIO_REPLAY";

/// Environment variable that turns on recording of live calls.
pub const RECORD_ENV_VAR: &str = "STUDIO_REC";

/// Directory that receives one timestamped folder per recording session.
pub const CASSETTE_ROOT: &str = ".festival-studio/cassettes";

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Open recording session. Call [`finish`](Self::finish) once the generator is dropped.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette to disk and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if a recording generator is still alive or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, StudioError> {
        let recorder = Arc::into_inner(self.recorder)
            .ok_or_else(|| io::Error::other("cassette recorder is still in use"))?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(recorder.finish()?)
    }
}

impl ServiceContext {
    /// Pick live, recording or replaying mode from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen mode cannot be set up.
    pub fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), StudioError> {
        if let Ok(cassette_path) = std::env::var(REPLAY_ENV_VAR) {
            tracing::info!(cassette = %cassette_path, "replaying recorded generations");
            return Ok((Self::replaying(Path::new(&cassette_path))?, None));
        }
        let is_recording = std::env::var(RECORD_ENV_VAR).is_ok_and(|v| v == "true" || v == "1");
        if is_recording {
            tracing::info!("recording mode enabled");
            let (ctx, session) = Self::recording(config)?;
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(config)?, None))
    }

    /// Create a live context talking to Gemini.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured.
    pub fn live(config: &Config) -> Result<Self, StudioError> {
        let key = config
            .api_key()
            .ok_or_else(|| StudioError::MissingApiKey { env_var: API_KEY_ENV_VARS[0].into() })?;
        Ok(Self { generator: Box::new(GeminiGenerator::new(key)) })
    }

    /// Wrap the live client so every call is appended to a fresh cassette
    /// under [`CASSETTE_ROOT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), StudioError> {
        let live = Self::live(config)?;

        let stamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = Path::new(CASSETTE_ROOT).join(&stamp).join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{stamp}-image_generator"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live.generator, Arc::clone(&recorder));
        Ok((Self { generator: Box::new(generator) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, StudioError> {
        let replayer = Arc::new(Mutex::new(load_cassette(path)?));
        Ok(Self { generator: Box::new(ReplayingImageGenerator::new(replayer)) })
    }
}

/// `HEAD` of the working directory's git checkout, or `"unknown"`.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map_or_else(|| "unknown".to_owned(), |hash| hash.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaying_missing_cassette_is_config_error() {
        let err = ServiceContext::replaying(Path::new("/nonexistent/none.cassette.yaml"))
            .err()
            .unwrap();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn finishing_writes_an_empty_cassette() {
        let dir = std::env::temp_dir().join("festival_studio_session_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("session.cassette.yaml");
        let session = RecordingSession {
            recorder: Arc::new(Mutex::new(CassetteRecorder::new(&path, "s", "abc"))),
        };

        assert_eq!(session.finish().unwrap(), path);
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finishing_while_recorder_is_shared_fails() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("unused.yaml", "s", "abc")));
        let _held = Arc::clone(&recorder);
        let session = RecordingSession { recorder };

        assert!(matches!(session.finish(), Err(StudioError::Io(_))));
    }
}
