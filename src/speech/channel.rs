use super::recognition::{RecognitionEvent, RecognitionOptions, ResultBatch, SpeechRecognizer};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;

type RunSender = mpsc::UnboundedSender<RecognitionEvent>;

#[derive(Default)]
struct Shared {
    run: Mutex<Option<RunSender>>,
    starts: AtomicUsize,
    fail_next_start: AtomicBool,
}

impl Shared {
    fn run(&self) -> MutexGuard<'_, Option<RunSender>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, event: RecognitionEvent) -> bool {
        match self.run().as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

/// Recognizer whose results are pushed in through a [`RecognizerFeed`]
///
/// Stands in for a platform recognizer wherever text arrives from somewhere
/// other than a microphone: a terminal, a test, an upstream STT service.
pub struct ChannelRecognizer {
    shared: Arc<Shared>,
}

/// Handle that drives a [`ChannelRecognizer`]
///
/// Every method targets the current capture run and returns `false` when no
/// run is active.
#[derive(Clone)]
pub struct RecognizerFeed {
    shared: Arc<Shared>,
}

impl ChannelRecognizer {
    pub fn new() -> (Self, RecognizerFeed) {
        let shared = Arc::new(Shared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            RecognizerFeed { shared },
        )
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for ChannelRecognizer {
    async fn start(
        &mut self,
        options: &RecognitionOptions,
    ) -> Result<mpsc::UnboundedReceiver<RecognitionEvent>> {
        if self.shared.fail_next_start.swap(false, Ordering::SeqCst) {
            anyhow::bail!("recognizer refused to start");
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(RecognitionEvent::Started).ok();
        *self.shared.run() = Some(tx);
        let run = self.shared.starts.fetch_add(1, Ordering::SeqCst) + 1;

        debug!("Channel recognizer run {} started ({})", run, options.language);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shared.run().take() {
            tx.send(RecognitionEvent::Ended).ok();
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.shared.run().is_some()
    }

    fn name(&self) -> &str {
        "channel"
    }
}

impl RecognizerFeed {
    /// Deliver a finalized phrase
    pub fn final_text(&self, text: impl Into<String>) -> bool {
        self.batch(ResultBatch::single(text, true))
    }

    /// Deliver an interim hypothesis
    pub fn interim_text(&self, text: impl Into<String>) -> bool {
        self.batch(ResultBatch::single(text, false))
    }

    pub fn batch(&self, batch: ResultBatch) -> bool {
        self.shared.send(RecognitionEvent::Results(batch))
    }

    /// Report a runtime error code without ending the run
    pub fn error(&self, code: impl Into<String>) -> bool {
        self.shared.send(RecognitionEvent::Error(code.into()))
    }

    /// End the current run as if the platform halted on its own
    pub fn halt(&self) -> bool {
        match self.shared.run().take() {
            Some(tx) => tx.send(RecognitionEvent::Ended).is_ok(),
            None => false,
        }
    }

    /// Make the next `start` fail once
    pub fn fail_next_start(&self) {
        self.shared.fail_next_start.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.shared.run().is_some()
    }

    /// Number of runs started so far
    pub fn start_count(&self) -> usize {
        self.shared.starts.load(Ordering::SeqCst)
    }
}
