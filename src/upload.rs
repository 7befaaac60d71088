//! Source photo loading and validation.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use base64::Engine;

use crate::error::{StudioError, UploadError};

/// MIME types accepted as source photos.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Largest accepted source photo, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Enough leading bytes for `image::guess_format` to recognise every accepted type.
const HEADER_BYTES: u64 = 32;

/// A validated source photo, base64-encoded for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Base64 payload (standard alphabet, padded).
    pub data: Arc<str>,
    /// MIME type of the payload.
    pub mime_type: String,
    /// Original size in bytes.
    pub size: u64,
}

/// Check a candidate file against the type allow-list and size limit.
///
/// # Errors
///
/// Returns the first rule the file breaks: type first, then size.
pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), UploadError> {
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(UploadError::UnsupportedType { mime_type: mime_type.to_string() });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size, max: MAX_UPLOAD_BYTES });
    }
    Ok(())
}

impl UploadedImage {
    /// Validate and encode raw bytes with a known MIME type.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] if the bytes are not an accepted photo.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self, UploadError> {
        let size = bytes.len() as u64;
        validate_upload(mime_type, size)?;
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(Self { data: Arc::from(data), mime_type: mime_type.to_string(), size })
    }

    /// Load a photo from disk.
    ///
    /// The type is sniffed from the file header and the size taken from
    /// metadata, so a rejected file is never read in full.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Upload`] for rejected files and
    /// [`StudioError::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, StudioError> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        let mut header = Vec::new();
        (&mut file).take(HEADER_BYTES).read_to_end(&mut header)?;
        let mime_type = sniff_mime_type(&header, path);
        validate_upload(mime_type, size)?;

        let mut bytes = header;
        file.read_to_end(&mut bytes)?;
        tracing::debug!(path = %path.display(), %mime_type, size, "loaded source photo");
        Ok(Self::from_bytes(&bytes, mime_type)?)
    }
}

/// Determine a MIME type from content, falling back to the file extension.
fn sniff_mime_type(bytes: &[u8], path: &Path) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map_or("application/octet-stream", |format| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(2, 2);
        let mut buf = std::io::Cursor::new(Vec::<u8>::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn accepts_allowed_types_within_limit() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_upload(mime, 2 * MIB).is_ok());
        }
        assert!(validate_upload("image/jpeg", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn rejects_pdf() {
        let err = validate_upload("application/pdf", 1024).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedType { mime_type: "application/pdf".into() });
    }

    #[test]
    fn rejects_twenty_mib() {
        let err = validate_upload("image/jpeg", 20 * MIB).unwrap_err();
        assert_eq!(err, UploadError::TooLarge { size: 20 * MIB, max: MAX_UPLOAD_BYTES });
    }

    #[test]
    fn rejects_one_byte_over_limit() {
        assert!(validate_upload("image/png", MAX_UPLOAD_BYTES + 1).is_err());
    }

    #[test]
    fn type_is_checked_before_size() {
        let err = validate_upload("image/gif", 20 * MIB).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[test]
    fn from_bytes_encodes_base64() {
        let upload = UploadedImage::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap();
        assert_eq!(&*upload.data, "/9j/4A==");
        assert_eq!(upload.size, 4);
        assert_eq!(upload.mime_type, "image/jpeg");
    }

    #[test]
    fn from_bytes_rejects_without_building_image() {
        assert!(UploadedImage::from_bytes(b"%PDF-1.7", "application/pdf").is_err());
    }

    #[test]
    fn from_path_sniffs_content() {
        let dir = std::env::temp_dir().join("festival_studio_upload_sniff");
        std::fs::create_dir_all(&dir).unwrap();
        // Misleading extension; the PNG signature wins.
        let path = dir.join("photo.jpg");
        std::fs::write(&path, png_bytes()).unwrap();

        let upload = UploadedImage::from_path(&path).unwrap();
        assert_eq!(upload.mime_type, "image/png");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_path_rejects_pdf() {
        let dir = std::env::temp_dir().join("festival_studio_upload_pdf");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("document.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%...").unwrap();

        let err = UploadedImage::from_path(&path).unwrap_err();
        assert!(matches!(err, StudioError::Upload(UploadError::UnsupportedType { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_path_rejects_oversized_file() {
        let dir = std::env::temp_dir().join("festival_studio_upload_big");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("huge.jpg");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(20 * MIB).unwrap();

        let err = UploadedImage::from_path(&path).unwrap_err();
        assert!(matches!(err, StudioError::Upload(UploadError::TooLarge { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_path_reports_type_before_size() {
        let dir = std::env::temp_dir().join("festival_studio_upload_big_pdf");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scan.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        std::io::Write::write_all(&mut file, b"%PDF-1.7\n").unwrap();
        file.set_len(20 * MIB).unwrap();

        let err = UploadedImage::from_path(&path).unwrap_err();
        assert!(matches!(err, StudioError::Upload(UploadError::UnsupportedType { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let err = UploadedImage::from_path(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(matches!(err, StudioError::Io(_)));
    }
}
