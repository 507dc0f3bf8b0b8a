use super::synthesis::{SpeechSynthesizer, SynthesisEvent, Utterance, Voice};
use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// Synthesizer that "speaks" by writing to stdout
pub struct ConsoleSynthesizer {
    speaker: String,
}

impl ConsoleSynthesizer {
    pub fn new(speaker: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(&self, utterance: Utterance) -> Result<mpsc::UnboundedReceiver<SynthesisEvent>> {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(SynthesisEvent::Started).ok();

        let line = format!("{}: {}\n", self.speaker, utterance.text);
        let mut stdout = tokio::io::stdout();
        match stdout.write_all(line.as_bytes()).await {
            Ok(()) => {
                stdout.flush().await.ok();
                tx.send(SynthesisEvent::Ended).ok();
            }
            Err(e) => {
                tx.send(SynthesisEvent::Error(e.to_string())).ok();
            }
        }

        Ok(rx)
    }

    async fn cancel(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
