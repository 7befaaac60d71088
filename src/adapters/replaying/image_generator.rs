//! Replaying adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

/// Serves recorded image generation results from a cassette.
pub struct ReplayingImageGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        tracing::debug!(variant = request.variant, "replaying image_generator::generate");
        let output = next_output(&self.replayer, "image_generator", "generate");
        Box::pin(async move { replay_result::<String>(output?) })
    }
}
