//! Live adapter for the Gemini image model.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini image generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);
            let body = GeminiRequest::from_generation_request(&request);

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            tracing::debug!(status = status.as_u16(), variant = request.variant, "gemini responded");

            if !status.is_success() {
                return Err(StudioError::from_api(status.as_u16(), response_text));
            }

            let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
                StudioError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            extract_image(parsed)
        })
    }
}

/// Pull the first inline image out of the first candidate.
fn extract_image(response: GeminiResponse) -> Result<String, StudioError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or(StudioError::EmptyResponse)?;

    parts
        .into_iter()
        .filter_map(|part| part.inline_data)
        .map(|inline| inline.data)
        .find(|data| !data.is_empty())
        .ok_or(StudioError::MissingImageData)
}

// --- Gemini API request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiRequestContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiRequestContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_modalities: Vec<&'static str>,
    image_config: GeminiImageConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiImageConfig {
    aspect_ratio: String,
}

impl GeminiRequest {
    fn from_generation_request(request: &GenerationRequest) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: request.mime_type.clone(),
                    data: request.image_data.to_string(),
                },
            },
            GeminiRequestPart::Text { text: request.prompt.clone() },
        ];
        Self {
            contents: vec![GeminiRequestContent { parts }],
            generation_config: GeminiGenerationConfig {
                response_modalities: vec!["IMAGE"],
                image_config: GeminiImageConfig { aspect_ratio: request.aspect_ratio.clone() },
            },
        }
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default)]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    data: String,
}
