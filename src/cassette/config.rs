//! Cassette loading.

use std::path::Path;

use super::format::Cassette;
use super::replayer::CassetteReplayer;
use crate::error::StudioError;

/// Read a YAML cassette from `path` and prepare it for replay.
///
/// # Errors
///
/// Returns [`StudioError::Config`] if the file is missing or not a cassette.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, StudioError> {
    let cassette = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|yaml| serde_yaml::from_str::<Cassette>(&yaml).map_err(|e| e.to_string()))
        .map_err(|e| StudioError::Config(format!("cassette {}: {e}", path.display())))?;
    tracing::debug!(
        cassette = %cassette.name,
        commit = %cassette.commit,
        interactions = cassette.interactions.len(),
        "loaded cassette"
    );
    Ok(CassetteReplayer::new(&cassette))
}
