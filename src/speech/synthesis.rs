use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Voice gender as reported by the platform, when it reports one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Female,
    Male,
}

/// Entry of the platform voice catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub name: String,
    pub language: String,
    pub gender: Option<VoiceGender>,
}

/// Request to speak a piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// `None` plays with the platform default voice
    pub voice: Option<Voice>,
}

/// Playback notifications for one utterance
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    Started,
    Ended,
    Error(String),
}

/// Text-to-speech playback backend
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Voices available for selection
    fn voices(&self) -> Vec<Voice>;

    /// Queue an utterance; playback events arrive on the returned receiver
    async fn speak(&self, utterance: Utterance) -> Result<mpsc::UnboundedReceiver<SynthesisEvent>>;

    /// Drop queued utterances and stop the current one
    async fn cancel(&self) -> Result<()>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Pick a voice whose name contains one of `keywords` (case-insensitive) or
/// that reports a female gender
pub fn select_voice<'a, S: AsRef<str>>(voices: &'a [Voice], keywords: &[S]) -> Option<&'a Voice> {
    voices.iter().find(|voice| {
        let name = voice.name.to_lowercase();
        keywords
            .iter()
            .any(|keyword| name.contains(&keyword.as_ref().to_lowercase()))
            || voice.gender == Some(VoiceGender::Female)
    })
}
