//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter wraps a live port implementation, forwards every call to it
//! and appends the request and its outcome to a shared recorder.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::chat_model::{ChatFuture, ChatModel, ChatRequest};
use crate::ports::image_captioner::{CaptionFuture, CaptionRequest, ImageCaptioner};
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest};

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = match serde_json::to_value(input) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(port, method, "not recording interaction, input unserializable: {e}");
            return;
        }
    };

    let output_json = match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(inner) => serde_json::json!({ "Ok": inner }),
            Err(e) => {
                tracing::warn!(port, method, "not recording interaction, output unserializable: {e}");
                return;
            }
        },
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(e) => tracing::warn!(port, method, "recorder lock poisoned: {e}"),
    }
}

/// Records chat interactions while delegating to an inner implementation.
pub struct RecordingChatModel {
    inner: Box<dyn ChatModel>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingChatModel {
    /// Creates a new recording chat model wrapping the given implementation.
    pub fn new(inner: Box<dyn ChatModel>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ChatModel for RecordingChatModel {
    fn send(&self, request: &ChatRequest) -> ChatFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.send(&request).await;
            record_result(&self.recorder, "chat_model", "send", &request, &result);
            result
        })
    }
}

/// Records captioning interactions while delegating to an inner implementation.
pub struct RecordingImageCaptioner {
    inner: Box<dyn ImageCaptioner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageCaptioner {
    /// Creates a new recording captioner wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageCaptioner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageCaptioner for RecordingImageCaptioner {
    fn caption(&self, request: &CaptionRequest) -> CaptionFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.caption(&request).await;
            record_result(&self.recorder, "image_captioner", "caption", &request, &result);
            result
        })
    }
}

/// Records image generation interactions while delegating to an inner implementation.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Creates a new recording generator wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            record_result(&self.recorder, "image_generator", "generate", &request, &result);
            result
        })
    }
}
