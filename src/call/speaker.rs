use super::config::VoiceSettings;
use super::events::{CallEvent, EventBus};
use crate::error::CallError;
use crate::speech::{select_voice, SpeechSynthesizer, SynthesisEvent, Utterance};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error};

/// Fire-and-forget playback on top of a `SpeechSynthesizer`
///
/// Emits `SpeechStarted` before queuing, then `SpeechEnded` or a synthesis
/// error from a background task once playback finishes.
#[derive(Clone)]
pub(crate) struct Speaker {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    settings: VoiceSettings,
    events: EventBus,
}

impl Speaker {
    pub(crate) fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        settings: VoiceSettings,
        events: EventBus,
    ) -> Self {
        Self {
            synthesizer,
            settings,
            events,
        }
    }

    pub(crate) async fn speak(&self, text: &str) {
        self.events.emit(CallEvent::SpeechStarted);

        let voices = self.synthesizer.voices();
        let voice = select_voice(&voices, &self.settings.preferred_voices).cloned();
        if let Some(voice) = &voice {
            debug!("Speaking with voice {}", voice.name);
        }

        let utterance = Utterance {
            text: text.to_string(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
            volume: self.settings.volume,
            voice,
        };

        let mut playback = match self.synthesizer.speak(utterance).await {
            Ok(rx) => rx,
            Err(e) => {
                error!("Speech synthesis error: {:#}", e);
                self.events
                    .emit(CallEvent::Error(CallError::Synthesis(e.to_string())));
                return;
            }
        };

        let events = self.events.clone();
        tokio::spawn(async move {
            while let Some(event) = playback.recv().await {
                match event {
                    SynthesisEvent::Started => debug!("Playback started"),
                    SynthesisEvent::Ended => {
                        events.emit(CallEvent::SpeechEnded);
                        break;
                    }
                    SynthesisEvent::Error(message) => {
                        error!("Speech synthesis error: {}", message);
                        events.emit(CallEvent::Error(CallError::Synthesis(message)));
                        break;
                    }
                }
            }
        });
    }

    pub(crate) async fn cancel(&self) -> Result<()> {
        self.synthesizer.cancel().await
    }
}
