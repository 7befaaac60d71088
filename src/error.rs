//! Unified error type for festival-studio.

use thiserror::Error;

/// Notice shown when a selected file is rejected.
pub const UPLOAD_NOTICE: &str = "Please choose a JPG, PNG or WebP image under 15MB.";

/// Errors that can occur while preparing or running a generation batch.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The model API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred. The transport message is passed through.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// A transport failure reported as plain text (e.g. replayed from a cassette).
    #[error("{0}")]
    Transport(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// The selected file was rejected before entering the studio.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No Gemini API key. Set {env_var} or add it to the config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },

    /// The model answered without any usable content.
    #[error("No content received from the image model.")]
    EmptyResponse,

    /// The model answered with content but no image part.
    #[error("Image data is missing from the model response.")]
    MissingImageData,

    /// The service rejected the configured credential.
    #[error("API key authentication failed. Please check the system configuration.")]
    Authentication,

    /// A failure that did not match any recognised shape.
    #[error("An unknown error occurred while generating the image.")]
    Unknown,

    /// A generation run is already in flight.
    #[error("A generation run is already in progress.")]
    Busy,

    /// A recorded cassette could not serve the requested interaction.
    #[error("Replay error: {0}")]
    Replay(String),
}

impl StudioError {
    /// Classify a non-success API response.
    ///
    /// Credential problems collapse into [`StudioError::Authentication`] so the
    /// user never sees transport details about the key.
    #[must_use]
    pub fn from_api(status: u16, message: String) -> Self {
        if status == 401 || status == 403 || mentions_credential(&message) {
            Self::Authentication
        } else {
            Self::Api { status, message }
        }
    }

    /// Classify a transport failure known only by its message.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        if mentions_credential(message) {
            Self::Authentication
        } else {
            Self::Transport(message.to_string())
        }
    }
}

/// Whether an error message is about the API credential.
fn mentions_credential(message: &str) -> bool {
    message.contains("API_KEY") || message.to_ascii_lowercase().contains("api key")
}

/// Reasons a selected file is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// MIME type outside the allow-list.
    #[error("Unsupported file type '{mime_type}'. {UPLOAD_NOTICE}")]
    UnsupportedType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// File larger than the accepted maximum.
    #[error("File is {size} bytes, above the {max} byte limit. {UPLOAD_NOTICE}")]
    TooLarge {
        /// Size of the rejected file.
        size: u64,
        /// The accepted maximum.
        max: u64,
    },
}
