//! Image generator port: one photo plus one prompt in, one image out.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::error::StudioError;

/// Image-capable multimodal model requested for every call.
pub const MODEL_ID: &str = "gemini-2.5-flash-image";

/// A single call to the image model.
///
/// Built fresh for every variant and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// The model identifier (e.g., `"gemini-2.5-flash-image"`).
    pub model: String,
    /// Base64 payload of the source photo. Left out of recordings.
    #[serde(skip_serializing)]
    pub image_data: Arc<str>,
    /// MIME type of the source photo.
    pub mime_type: String,
    /// Full prompt for this variant.
    pub prompt: String,
    /// Aspect ratio (e.g., `"3:4"`).
    pub aspect_ratio: String,
    /// 0-based position of this image within its batch.
    pub variant: usize,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
///
/// Resolves to the base64 payload of the generated image.
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, StudioError>> + Send + 'a>>;

/// Produces one stylised image per request via an external model.
///
/// Implementations must not retry; a failed call is reported as is.
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}
