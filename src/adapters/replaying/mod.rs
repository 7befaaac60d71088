//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::StudioError;

/// Retrieve the next recorded output for a given port and method.
///
/// # Errors
///
/// Returns [`StudioError::Replay`] if the cassette has no more interactions
/// for the pair or the replayer lock is poisoned.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, StudioError> {
    let mut guard = replayer
        .lock()
        .map_err(|e| StudioError::Replay(format!("replayer lock poisoned: {e}")))?;
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output)
        .map_err(StudioError::Replay)
}

/// Deserialize a replayed output as `Result<T, StudioError>`.
///
/// A recorded `Err` string is classified the same way a live failure would
/// be; an `Err` that is not a string becomes [`StudioError::Unknown`].
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, StudioError> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(err_val.as_str().map_or(StudioError::Unknown, StudioError::from_message));
    }
    let ok_val = match output.get("Ok").or_else(|| output.get("ok")) {
        Some(v) => v.clone(),
        None => output,
    };
    serde_json::from_value(ok_val)
        .map_err(|e| StudioError::Replay(format!("malformed recorded output: {e}")))
}
