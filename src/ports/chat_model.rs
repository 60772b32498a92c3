//! Chat model port for multi-turn text conversations.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GuruError;

/// Author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing.
    User,
    /// The chat model.
    Model,
}

impl Role {
    /// Name shown when a transcript is printed.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One role-tagged message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub text: String,
}

impl ChatMessage {
    /// A message typed by the user.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    /// A message written by the model.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

/// A request for the next model turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The resolved model identifier (e.g., `"gemini-pro"`).
    pub model: String,
    /// All earlier messages, oldest first.
    pub history: Vec<ChatMessage>,
    /// The new user message.
    pub message: String,
}

/// The model's reply to a [`ChatRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Reply text.
    pub text: String,
}

/// Boxed future type returned by [`ChatModel::send`].
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<ChatReply, GuruError>> + Send + 'a>>;

/// Produces chat replies via an external API.
pub trait ChatModel: Send + Sync {
    /// Send a message along with the prior history and return the reply.
    fn send(&self, request: &ChatRequest) -> ChatFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_maps_model_to_assistant() {
        assert_eq!(Role::Model.to_string(), "assistant");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
    }

    #[test]
    fn chat_request_keeps_history_order() {
        let request = ChatRequest {
            model: "gemini-pro".into(),
            history: vec![ChatMessage::user("hello"), ChatMessage::model("hi there")],
            message: "how are you?".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.history, request.history);
        assert_eq!(back.message, "how are you?");
    }
}
