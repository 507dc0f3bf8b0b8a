use crate::speech::RecognitionOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Spoken when a completion round trip fails
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble processing your response. Could you please try again?";

/// Tuning applied to every spoken utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,

    /// Case-insensitive name fragments that mark a preferred voice
    pub preferred_voices: Vec<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
            preferred_voices: vec![
                "female".to_string(),
                "sarah".to_string(),
                "samantha".to_string(),
            ],
        }
    }
}

/// Configuration for a voice call
#[derive(Debug, Clone)]
pub struct CallConfig {
    /// Pause before the opening line so the audio stack can settle
    pub opening_delay: Duration,

    /// Upper bound on one completion round trip (`None` waits forever)
    pub completion_timeout: Option<Duration>,

    /// Spoken instead of a reply when a round trip fails
    pub fallback_reply: String,

    /// Options for each capture run
    pub recognition: RecognitionOptions,

    /// Playback tuning and voice preference
    pub voice: VoiceSettings,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            opening_delay: Duration::from_secs(1),
            completion_timeout: Some(Duration::from_secs(30)),
            fallback_reply: FALLBACK_REPLY.to_string(),
            recognition: RecognitionOptions::default(),
            voice: VoiceSettings::default(),
        }
    }
}
