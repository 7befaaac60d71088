//! Generation orchestration and the studio state it publishes.
//!
//! A batch is a strictly sequential loop: each call to the image model is
//! awaited before the next one starts, and the first failure ends the batch.

use tokio::sync::watch;

use crate::error::StudioError;
use crate::params::GenerationOptions;
use crate::ports::{GenerationRequest, ImageGenerator, MODEL_ID};
use crate::prompt::build_prompt;
use crate::upload::UploadedImage;

/// Prefix that turns a returned payload into displayable image data.
pub const RESULT_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// What the front end renders.
///
/// At most one of `results` and `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudioState {
    /// A batch is in flight.
    pub loading: bool,
    /// Images from the last successful batch, as data URIs in call order.
    pub results: Option<Vec<String>>,
    /// Message from the last failed batch.
    pub error: Option<String>,
}

/// Run one batch against `generator`.
///
/// Returns the images as data URIs in call order. The first failing call
/// aborts the batch; later variants are never requested and earlier images
/// are dropped.
///
/// # Errors
///
/// Returns the error of the first failing call, unchanged.
pub async fn run_batch(
    generator: &dyn ImageGenerator,
    image: &UploadedImage,
    options: &GenerationOptions,
) -> Result<Vec<String>, StudioError> {
    let count = options.count.get();
    let mut results = Vec::with_capacity(count);
    tracing::debug!(count, mime_type = %image.mime_type, size = image.size, "starting batch");

    for variant in 0..count {
        let request = GenerationRequest {
            model: MODEL_ID.to_string(),
            image_data: image.data.clone(),
            mime_type: image.mime_type.clone(),
            prompt: build_prompt(options, variant),
            aspect_ratio: options.aspect_ratio.to_string(),
            variant,
        };
        tracing::debug!(variant, prompt = %request.prompt, "requesting image");

        let payload = generator.generate(&request).await.inspect_err(|e| {
            tracing::warn!(variant, error = %e, "generation failed, aborting batch");
        })?;
        tracing::info!(variant, count, "image received");
        results.push(format!("{RESULT_DATA_URI_PREFIX}{payload}"));
    }

    Ok(results)
}

/// Owns the image generator and the single published [`StudioState`].
pub struct Studio {
    generator: Box<dyn ImageGenerator>,
    state: watch::Sender<StudioState>,
}

impl Studio {
    /// Create a studio with an idle, empty state.
    #[must_use]
    pub fn new(generator: Box<dyn ImageGenerator>) -> Self {
        let (state, _) = watch::channel(StudioState::default());
        Self { generator, state }
    }

    /// Watch state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StudioState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> StudioState {
        self.state.borrow().clone()
    }

    /// Generate a batch for `image` and publish the outcome.
    ///
    /// Clears the previous results or error and raises the in-flight flag
    /// before the first call; the flag is lowered on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Busy`] without touching the state if a batch is
    /// already running, or the batch error otherwise.
    pub async fn generate(
        &self,
        image: &UploadedImage,
        options: &GenerationOptions,
    ) -> Result<Vec<String>, StudioError> {
        let started = self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            *state = StudioState { loading: true, results: None, error: None };
            true
        });
        if !started {
            return Err(StudioError::Busy);
        }
        let _in_flight = InFlight(&self.state);

        tracing::info!(
            theme = options.theme.slug(),
            count = options.count.get(),
            aspect_ratio = %options.aspect_ratio,
            "starting generation batch"
        );
        let outcome = run_batch(self.generator.as_ref(), image, options).await;

        self.state.send_modify(|state| {
            *state = match &outcome {
                Ok(images) => {
                    StudioState { loading: false, results: Some(images.clone()), error: None }
                }
                Err(e) => StudioState { loading: false, results: None, error: Some(e.to_string()) },
            };
        });
        outcome
    }
}

/// Lowers the in-flight flag when a run is dropped before publishing its outcome.
struct InFlight<'a>(&'a watch::Sender<StudioState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| {
            if !state.loading {
                return false;
            }
            tracing::debug!("generation run abandoned");
            *state = StudioState::default();
            true
        });
    }
}
