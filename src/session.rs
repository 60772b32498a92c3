//! Chat transcript owned by the caller and threaded through each turn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GuruError;
use crate::ports::chat_model::{ChatMessage, ChatModel, ChatRequest};

/// An ordered, role-tagged conversation transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start an empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Load a transcript from a JSON session file.
    ///
    /// A missing file is an empty conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, GuruError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            GuruError::Config(format!("Failed to parse session {}: {e}", path.display()))
        })
    }

    /// Write the transcript to a JSON session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GuruError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GuruError::Config(format!("Failed to serialize session: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Send one user message and return the model's reply.
    ///
    /// The user message and the reply are appended together once the reply
    /// arrives; a failed turn leaves the transcript untouched.
    ///
    /// # Errors
    ///
    /// Returns whatever error the chat model reports.
    pub async fn send(
        &mut self,
        chat: &dyn ChatModel,
        model: &str,
        message: &str,
    ) -> Result<String, GuruError> {
        let request = ChatRequest {
            model: model.to_string(),
            history: self.messages.clone(),
            message: message.to_string(),
        };
        let reply = chat.send(&request).await?;

        self.messages.push(ChatMessage::user(message));
        self.messages.push(ChatMessage::model(reply.text.clone()));
        tracing::debug!(turns = self.messages.len() / 2, "chat turn complete");
        Ok(reply.text)
    }

    /// Render the transcript as `role: text` lines.
    #[must_use]
    pub fn render(&self) -> String {
        self.messages.iter().map(|m| format!("{}: {}\n", m.role, m.text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ports::chat_model::{ChatFuture, ChatReply, Role};

    /// Replies with the number of history messages it was given.
    struct CountingChat {
        seen: Mutex<Vec<usize>>,
    }

    impl ChatModel for CountingChat {
        fn send(&self, request: &ChatRequest) -> ChatFuture<'_> {
            let n = request.history.len();
            self.seen.lock().unwrap().push(n);
            Box::pin(async move { Ok(ChatReply { text: format!("seen {n}") }) })
        }
    }

    struct FailingChat;

    impl ChatModel for FailingChat {
        fn send(&self, _request: &ChatRequest) -> ChatFuture<'_> {
            Box::pin(async { Err(GuruError::Api { status: 503, message: "unavailable".into() }) })
        }
    }

    #[tokio::test]
    async fn each_turn_appends_user_then_model() {
        let chat = CountingChat { seen: Mutex::new(Vec::new()) };
        let mut session = ChatSession::new();

        assert_eq!(session.send(&chat, "gemini-pro", "hello").await.unwrap(), "seen 0");
        assert_eq!(session.send(&chat, "gemini-pro", "again").await.unwrap(), "seen 2");

        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User, Role::Model]);
        assert_eq!(session.messages()[2].text, "again");
        assert_eq!(*chat.seen.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn failed_turn_leaves_transcript_unchanged() {
        let mut session = ChatSession::new();
        assert!(session.send(&FailingChat, "gemini-pro", "hello").await.is_err());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn render_uses_display_roles() {
        let session = ChatSession {
            messages: vec![ChatMessage::user("hi"), ChatMessage::model("hello!")],
        };
        assert_eq!(session.render(), "user: hi\nassistant: hello!\n");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions/today.json");
        let session = ChatSession {
            messages: vec![ChatMessage::user("hi"), ChatMessage::model("hello!")],
        };

        session.save(&path).unwrap();
        assert_eq!(ChatSession::load(&path).unwrap(), session);
    }

    #[test]
    fn missing_session_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session = ChatSession::load(&dir.path().join("none.json")).unwrap();
        assert!(session.messages().is_empty());
    }

    #[test]
    fn corrupt_session_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[not a session").unwrap();
        assert!(ChatSession::load(&path).is_err());
    }
}
