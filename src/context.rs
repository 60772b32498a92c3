//! Builds port implementations for the selected run mode.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::{GeminiCaptioner, GeminiChat};
use crate::adapters::live::octoai::OctoAiGenerator;
use crate::adapters::recording::{
    RecordingChatModel, RecordingImageCaptioner, RecordingImageGenerator,
};
use crate::adapters::replaying::{
    ReplayingChatModel, ReplayingImageCaptioner, ReplayingImageGenerator,
};
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::GuruError;
use crate::ports::{ChatModel, ImageCaptioner, ImageGenerator};

enum Mode {
    Live,
    Recording(Arc<Mutex<CassetteRecorder>>),
    Replaying(Arc<Mutex<CassetteReplayer>>),
}

/// Hands out port trait objects wired for live, recording or replaying use.
pub struct ServiceContext<'a> {
    config: &'a Config,
    mode: Mode,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write everything recorded so far to the cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = self.recorder.lock().map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl<'a> ServiceContext<'a> {
    /// Context whose ports call the real APIs.
    #[must_use]
    pub fn live(config: &'a Config) -> Self {
        Self { config, mode: Mode::Live }
    }

    /// Context whose ports call the real APIs and record every interaction.
    ///
    /// The cassette is written under `.guru/cassettes/<timestamp>/`.
    #[must_use]
    pub fn recording(config: &'a Config, command: &str) -> (Self, RecordingSession) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".guru/cassettes")
            .join(&timestamp)
            .join(format!("{command}.cassette.yaml"));
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-{command}"),
            get_commit_hash(),
        )));

        let ctx = Self { config, mode: Mode::Recording(Arc::clone(&recorder)) };
        (ctx, RecordingSession { recorder })
    }

    /// Context whose ports answer from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(config: &'a Config, path: &Path) -> Result<Self, GuruError> {
        let replayer = load_cassette(path)
            .map_err(|e| GuruError::Config(format!("Failed to load cassette: {e}")))?;
        Ok(Self { config, mode: Mode::Replaying(Arc::new(Mutex::new(replayer))) })
    }

    /// The chat model port.
    ///
    /// # Errors
    ///
    /// Returns an error if a live adapter is needed and no Gemini key is configured.
    pub fn chat_model(&self) -> Result<Box<dyn ChatModel>, GuruError> {
        let chat: Box<dyn ChatModel> = match &self.mode {
            Mode::Replaying(replayer) => Box::new(ReplayingChatModel::new(Arc::clone(replayer))),
            Mode::Live => Box::new(GeminiChat::new(self.gemini_key()?)),
            Mode::Recording(recorder) => Box::new(RecordingChatModel::new(
                Box::new(GeminiChat::new(self.gemini_key()?)),
                Arc::clone(recorder),
            )),
        };
        Ok(chat)
    }

    /// The image captioning port.
    ///
    /// # Errors
    ///
    /// Returns an error if a live adapter is needed and no Gemini key is configured.
    pub fn image_captioner(&self) -> Result<Box<dyn ImageCaptioner>, GuruError> {
        let captioner: Box<dyn ImageCaptioner> = match &self.mode {
            Mode::Replaying(replayer) => {
                Box::new(ReplayingImageCaptioner::new(Arc::clone(replayer)))
            }
            Mode::Live => Box::new(GeminiCaptioner::new(self.gemini_key()?)),
            Mode::Recording(recorder) => Box::new(RecordingImageCaptioner::new(
                Box::new(GeminiCaptioner::new(self.gemini_key()?)),
                Arc::clone(recorder),
            )),
        };
        Ok(captioner)
    }

    /// The image generation port.
    ///
    /// # Errors
    ///
    /// Returns an error if a live adapter is needed and no `OctoAI` token is configured.
    pub fn image_generator(&self) -> Result<Box<dyn ImageGenerator>, GuruError> {
        let generator: Box<dyn ImageGenerator> = match &self.mode {
            Mode::Replaying(replayer) => {
                Box::new(ReplayingImageGenerator::new(Arc::clone(replayer)))
            }
            Mode::Live => Box::new(OctoAiGenerator::new(self.octoai_key()?)),
            Mode::Recording(recorder) => Box::new(RecordingImageGenerator::new(
                Box::new(OctoAiGenerator::new(self.octoai_key()?)),
                Arc::clone(recorder),
            )),
        };
        Ok(generator)
    }

    fn gemini_key(&self) -> Result<String, GuruError> {
        self.config.gemini_key().ok_or_else(|| GuruError::MissingApiKey {
            provider: "Gemini".into(),
            env_var: "GEMINI_API_KEY".into(),
        })
    }

    fn octoai_key(&self) -> Result<String, GuruError> {
        self.config.octoai_key().ok_or_else(|| GuruError::MissingApiKey {
            provider: "OctoAI".into(),
            env_var: "OCTOAI_TOKEN".into(),
        })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
