//! Live adapter for the `OctoAI` text-to-image API.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{truncate_body, GuruError};
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

const OCTOAI_API_BASE: &str = "https://image.octoai.run/generate";

/// Live `OctoAI` image generator.
pub struct OctoAiGenerator {
    client: Client,
    api_key: String,
}

impl OctoAiGenerator {
    /// Create a new `OctoAI` generator with the given API token.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

impl ImageGenerator for OctoAiGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{OCTOAI_API_BASE}/{}", request.engine);
            tracing::debug!(%url, width = request.width, height = request.height, "calling OctoAI");

            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&generation_body(&request))
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(GuruError::Api { status: status.as_u16(), message: response_text });
            }

            parse_images(&response_text)
        })
    }
}

fn generation_body(request: &ImageRequest) -> Value {
    let mut body = json!({
        "prompt": request.prompt,
        "width": request.width,
        "height": request.height,
        "steps": request.steps,
        "cfg_scale": request.cfg_scale,
        "num_images": request.count,
    });
    if let Some(ref negative) = request.negative_prompt {
        body["negative_prompt"] = json!(negative);
    }
    if let Some(seed) = request.seed {
        body["seed"] = json!(seed);
    }
    body
}

/// Decode the images of a generation response.
///
/// Safety-filtered entries are kept, flagged, with whatever data the API sent.
fn parse_images(response_text: &str) -> Result<ImageResponse, GuruError> {
    let parsed: OctoAiResponse = serde_json::from_str(response_text).map_err(|e| {
        GuruError::bad_response(format!(
            "Failed to parse response: {e}. Body: {}",
            truncate_body(response_text)
        ))
    })?;

    let mut images = Vec::with_capacity(parsed.images.len());
    for item in parsed.images {
        let data = match item.image_b64 {
            Some(ref b64) if !b64.is_empty() => base64::engine::general_purpose::STANDARD
                .decode(b64)
                .map_err(|e| GuruError::bad_response(format!("Failed to decode base64: {e}")))?,
            _ => Vec::new(),
        };
        let mime_type = sniff_mime(&data).to_string();
        images.push(GeneratedImage { data, mime_type, removed_for_safety: item.removed_for_safety });
    }

    Ok(ImageResponse { images })
}

fn sniff_mime(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::WebP) => "image/webp",
        _ => "image/jpeg",
    }
}

// --- OctoAI API response types ---

#[derive(Deserialize)]
struct OctoAiResponse {
    #[serde(default)]
    images: Vec<OctoAiImage>,
}

#[derive(Deserialize)]
struct OctoAiImage {
    image_b64: Option<String>,
    #[serde(default)]
    removed_for_safety: bool,
}
