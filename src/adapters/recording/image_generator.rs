//! Recording adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

/// Records image generation interactions while delegating to an inner implementation.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Creates a new recording generator wrapping the given implementation.
    #[must_use]
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            record_result(&recorder, "image_generator", "generate", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use crate::error::StudioError;

    struct Scripted;

    impl ImageGenerator for Scripted {
        fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
            let variant = request.variant;
            Box::pin(async move {
                if variant == 0 {
                    Ok("Zmlyc3Q=".to_string())
                } else {
                    Err(StudioError::Transport("transport error: timeout".into()))
                }
            })
        }
    }

    fn request(variant: usize) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-2.5-flash-image".into(),
            image_data: Arc::from("cGhvdG8="),
            mime_type: "image/png".into(),
            prompt: format!("variant {variant}"),
            aspect_ratio: "1:1".into(),
            variant,
        }
    }

    #[tokio::test]
    async fn records_successes_and_failures() {
        let dir = std::env::temp_dir().join("festival_studio_recording_adapter_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "rec", "abc")));

        let generator = RecordingImageGenerator::new(Box::new(Scripted), Arc::clone(&recorder));
        assert_eq!(generator.generate(&request(0)).await.unwrap(), "Zmlyc3Q=");
        assert!(generator.generate(&request(1)).await.is_err());
        drop(generator);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].output["Ok"], "Zmlyc3Q=");
        assert_eq!(cassette.interactions[0].input["prompt"], "variant 0");
        assert!(cassette.interactions[0].input.get("image_data").is_none());
        assert_eq!(cassette.interactions[1].output["Err"], "transport error: timeout");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
