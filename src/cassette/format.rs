//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session: every port call made during one run, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Recorded calls.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One recorded port call.
///
/// `output` follows the `{"Ok": value}` / `{"Err": message}` convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position within the session.
    pub seq: u64,
    /// Port name, e.g. `image_generator`.
    pub port: String,
    /// Method name, e.g. `generate`.
    pub method: String,
    /// Serialized call input.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Serialized call result.
    pub output: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml() {
        let yaml = "name: tet\nrecorded_at: \"2026-01-20T08:00:00Z\"\ncommit: abc\ninteractions:\n  - seq: 0\n    port: image_generator\n    method: generate\n    output:\n      Ok: Zmlyc3Q=\n";
        let cassette: Cassette = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cassette.name, "tet");
        assert_eq!(cassette.interactions.len(), 1);
        assert!(cassette.interactions[0].input.is_null());
        assert_eq!(cassette.interactions[0].output["Ok"], "Zmlyc3Q=");
    }
}
