//! File naming, image saving, and format conversion.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;

use crate::error::StudioError;
use crate::params::OutputFormat;
use crate::theme::Theme;

/// Generate an output filename from a theme, batch position and format.
///
/// `index` is 1-based. Example: `tet-1768896000-1.png`.
#[must_use]
pub fn auto_filename(theme: Theme, index: usize, format: OutputFormat) -> String {
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{}-{timestamp}-{index}.{}", theme.slug(), format.extension())
}

/// Resolve the path for image `index` (1-based) of a batch of `total`.
///
/// An explicit path is used as is for single images and gets a `-N` suffix
/// otherwise; without one, files are auto-named inside `output_dir`.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&Path>,
    output_dir: &Path,
    theme: Theme,
    index: usize,
    total: usize,
    format: OutputFormat,
) -> PathBuf {
    match explicit {
        Some(path) if total <= 1 => path.to_path_buf(),
        Some(path) => {
            let stem = path.file_stem().unwrap_or_default().to_string_lossy();
            let ext = path
                .extension()
                .map_or_else(|| format.extension().to_string(), |e| e.to_string_lossy().into());
            path.with_file_name(format!("{stem}-{index}.{ext}"))
        }
        None => output_dir.join(auto_filename(theme, index, format)),
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI into its MIME type and bytes.
///
/// # Errors
///
/// Returns an error if the URI is not base64 image data.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), StudioError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| StudioError::ImageConversion("not a data URI".into()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| StudioError::ImageConversion("data URI is not base64".into()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to decode base64: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Save one result (a data URI) to `output_path` in the requested format.
///
/// The real format of the bytes is sniffed rather than trusted from the URI.
///
/// # Errors
///
/// Returns an error if decoding, conversion or writing fails.
pub fn save_data_uri(
    uri: &str,
    target_format: OutputFormat,
    output_path: &Path,
) -> Result<(), StudioError> {
    let (declared_mime, data) = decode_data_uri(uri)?;
    let source_mime = image::guess_format(&data)
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or(declared_mime);
    save_image(&data, &source_mime, target_format, output_path)
}

/// Save raw image bytes to a file, converting format if necessary.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    target_format: OutputFormat,
    output_path: &Path,
) -> Result<(), StudioError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if source_mime == target_format.mime_type() {
        std::fs::write(output_path, data).map_err(StudioError::Io)
    } else {
        tracing::debug!(from = source_mime, to = target_format.mime_type(), "converting image");
        convert_and_save(data, target_format, output_path)
    }
}

/// Convert image bytes to the target format and save.
fn convert_and_save(
    data: &[u8],
    target_format: OutputFormat,
    output_path: &Path,
) -> Result<(), StudioError> {
    let img = image::load_from_memory(data)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to decode image: {e}")))?;

    // JPEG has no alpha channel.
    let img = if target_format == OutputFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, target_format.image_format()).map_err(|e| {
        StudioError::ImageConversion(format!(
            "Failed to save as {}: {e}",
            target_format.extension()
        ))
    })
}
