//! Configuration file loading with environment variable overrides.
//!
//! The configuration is read once at start-up and never written back; the
//! API key in particular has no setter.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::params::{AspectRatio, ImageCount, OutputFormat};
use crate::theme::Theme;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    keys: KeysConfig,

    /// Default option values used when a flag is not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
struct KeysConfig {
    gemini: Option<String>,
}

/// Default option values from the config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default theme.
    pub theme: Theme,
    /// Default aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Default number of images.
    pub count: ImageCount,
    /// Keep facial features by default.
    pub preserve_identity: bool,
    /// Isolate the subject on a studio background by default.
    pub isolate_background: bool,
    /// Default output format.
    pub format: OutputFormat,
    /// Directory for auto-named output files.
    pub output_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            aspect_ratio: AspectRatio::default(),
            count: ImageCount::default(),
            preserve_identity: true,
            isolate_background: false,
            format: OutputFormat::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring environment variables.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .or_else(|| self.keys.gemini.clone())
    }
}

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "FESTIVAL_STUDIO_CONFIG";

/// Where to read the config from: `--config`, then [`CONFIG_ENV_VAR`], then
/// `~/.config/festival-studio/config.toml`.
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

fn default_config_path() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from("festival-studio.toml"),
        |home| PathBuf::from(home).join(".config").join("festival-studio").join("config.toml"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.keys.gemini.is_none());
        assert_eq!(config.defaults.theme, Theme::Tet);
        assert_eq!(config.defaults.aspect_ratio, AspectRatio::Square);
        assert_eq!(config.defaults.count, ImageCount::Two);
        assert!(config.defaults.preserve_identity);
        assert!(!config.defaults.isolate_background);
        assert_eq!(config.defaults.format, OutputFormat::Png);
        assert_eq!(config.defaults.output_dir, PathBuf::from("."));
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.defaults.theme, Theme::Tet);
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("festival_studio_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[keys]
gemini = "test-gemini-key"

[defaults]
theme = "Tết Trung Thu"
aspect_ratio = "9:16"
count = 4
preserve_identity = false
isolate_background = true
format = "webp"
output_dir = "/tmp/festival"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.keys.gemini.as_deref(), Some("test-gemini-key"));
        assert_eq!(config.defaults.theme, Theme::MidAutumn);
        assert_eq!(config.defaults.aspect_ratio, AspectRatio::Story);
        assert_eq!(config.defaults.count, ImageCount::Four);
        assert!(!config.defaults.preserve_identity);
        assert!(config.defaults.isolate_background);
        assert_eq!(config.defaults.format, OutputFormat::Webp);
        assert_eq!(config.defaults.output_dir, PathBuf::from("/tmp/festival"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_defaults_fill_in() {
        let config: Config = toml::from_str("[defaults]\ntheme = \"valentine\"\n").unwrap();
        assert_eq!(config.defaults.theme, Theme::Valentine);
        assert_eq!(config.defaults.count, ImageCount::Two);
        assert!(config.defaults.preserve_identity);
    }

    #[test]
    fn load_invalid_count() {
        assert!(toml::from_str::<Config>("[defaults]\ncount = 3\n").is_err());
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("festival_studio_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
