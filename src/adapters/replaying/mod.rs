//! Replaying adapters that serve recorded interactions from cassettes.
//!
//! The request passed to a replaying adapter is ignored; outputs are handed
//! back in the order they were recorded for that port.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::GuruError;
use crate::ports::chat_model::{ChatFuture, ChatModel, ChatReply, ChatRequest};
use crate::ports::image_captioner::{CaptionFuture, CaptionReply, CaptionRequest, ImageCaptioner};
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Take the next recorded output for `port`/`method` and decode it.
///
/// A recorded `Err` is replayed as an API error carrying the original message.
fn replay<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, GuruError> {
    let output = {
        let mut guard = replayer
            .lock()
            .map_err(|e| GuruError::Config(format!("Replayer lock poisoned: {e}")))?;
        guard.next_interaction(port, method).map_err(GuruError::Config)?.output.clone()
    };
    tracing::debug!(port, method, "replaying recorded interaction");
    replay_result(output).map_err(|message| GuruError::Api { status: 0, message })
}

/// Deserialize a replayed output using the Ok/Err JSON convention.
fn replay_result<T: DeserializeOwned>(output: serde_json::Value) -> Result<T, String> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(err_val.as_str().unwrap_or("replayed error").to_string());
    }
    let value = match output.get("Ok").or_else(|| output.get("ok")) {
        Some(ok_val) => ok_val.clone(),
        None => output,
    };
    serde_json::from_value(value).map_err(|e| format!("Malformed cassette output: {e}"))
}

/// Serves recorded chat replies from a cassette.
pub struct ReplayingChatModel {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingChatModel {
    /// Create a replaying chat model backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ChatModel for ReplayingChatModel {
    fn send(&self, _request: &ChatRequest) -> ChatFuture<'_> {
        let result = replay::<ChatReply>(&self.replayer, "chat_model", "send");
        Box::pin(async move { result })
    }
}

/// Serves recorded captions from a cassette.
pub struct ReplayingImageCaptioner {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageCaptioner {
    /// Create a replaying captioner backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageCaptioner for ReplayingImageCaptioner {
    fn caption(&self, _request: &CaptionRequest) -> CaptionFuture<'_> {
        let result = replay::<CaptionReply>(&self.replayer, "image_captioner", "caption");
        Box::pin(async move { result })
    }
}

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
    fn generate(&self, _request: &ImageRequest) -> GenerateFuture<'_> {
        let result = replay::<ImageResponse>(&self.replayer, "image_generator", "generate");
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    fn replayer(interactions: Vec<Interaction>) -> Arc<Mutex<CassetteReplayer>> {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: chrono::Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        Arc::new(Mutex::new(CassetteReplayer::new(&cassette)))
    }

    fn chat_interaction(seq: u64, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "chat_model".into(), method: "send".into(), input: json!({}), output }
    }

    fn request() -> ChatRequest {
        ChatRequest { model: "gemini-pro".into(), history: Vec::new(), message: "hi".into() }
    }

    #[tokio::test]
    async fn replays_ok_then_err() {
        let chat = ReplayingChatModel::new(replayer(vec![
            chat_interaction(0, json!({"Ok": {"text": "hello"}})),
            chat_interaction(1, json!({"Err": "API error (429): quota"})),
        ]));

        assert_eq!(chat.send(&request()).await.unwrap().text, "hello");
        let err = chat.send(&request()).await.unwrap_err();
        assert!(err.to_string().contains("quota"));
    }

    #[tokio::test]
    async fn exhausted_cassette_is_an_error() {
        let chat = ReplayingChatModel::new(replayer(vec![]));
        let err = chat.send(&request()).await.unwrap_err();
        assert!(err.to_string().contains("no interactions recorded"));
    }

    #[test]
    fn bare_output_without_ok_wrapper() {
        let reply: ChatReply = replay_result(json!({"text": "plain"})).unwrap();
        assert_eq!(reply.text, "plain");
    }

    #[test]
    fn malformed_output_is_reported() {
        assert!(replay_result::<ChatReply>(json!({"Ok": {"wrong": 1}})).is_err());
    }
}
