//! Image captioner port for vision models.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::base64_bytes;
use crate::error::GuruError;

/// A request to describe a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRequest {
    /// The resolved model identifier (e.g., `"gemini-1.5-flash-latest"`).
    pub model: String,
    /// Raw image bytes.
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
    /// MIME type of the image (`"image/jpeg"` or `"image/png"`).
    pub mime_type: String,
    /// Optional instruction sent along with the image.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// A caption produced for a [`CaptionRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionReply {
    /// Caption text.
    pub text: String,
}

/// Boxed future type returned by [`ImageCaptioner::caption`].
pub type CaptionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CaptionReply, GuruError>> + Send + 'a>>;

/// Describes images via an external API.
pub trait ImageCaptioner: Send + Sync {
    /// Caption the image in the request.
    fn caption(&self, request: &CaptionRequest) -> CaptionFuture<'_>;
}
