//! Image generator port for text-to-image APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::base64_bytes;
use crate::error::GuruError;

/// A request to generate images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Generation engine (e.g., `"sdxl"`).
    pub engine: String,
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Things the image should not contain.
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of denoising steps.
    pub steps: u32,
    /// Classifier-free guidance scale.
    pub cfg_scale: f32,
    /// Number of images to generate.
    pub count: u32,
    /// Fixed seed for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A single generated image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/jpeg"`).
    pub mime_type: String,
    /// The provider withheld this image under its content-safety policy.
    #[serde(default)]
    pub removed_for_safety: bool,
}

/// Response containing generated images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// The generated images.
    pub images: Vec<GeneratedImage>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageResponse, GuruError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate images for the given request.
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_flag_defaults_to_false() {
        let image: GeneratedImage =
            serde_json::from_str(r#"{"data":"AQID","mime_type":"image/png"}"#).unwrap();
        assert_eq!(image.data, vec![1, 2, 3]);
        assert!(!image.removed_for_safety);
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let request: ImageRequest = serde_json::from_str(
            r#"{"engine":"sdxl","prompt":"a cat","width":1024,"height":1024,
                "steps":30,"cfg_scale":7.5,"count":1}"#,
        )
        .unwrap();
        assert!(request.negative_prompt.is_none());
        assert!(request.seed.is_none());
    }
}
