use super::config::CallConfig;
use super::driver::{CallDriver, Opening, SharedRecognizer};
use super::events::{CallEvent, EventBus, EventKind};
use super::speaker::Speaker;
use super::state::CallState;
use super::stats::{CallPhase, CallStats};
use crate::assistant::{substitute, AssistantConfig, VariableValues};
use crate::completion::{ChatTurn, CompletionService};
use crate::error::CallError;
use crate::speech::{SpeechRecognizer, SpeechSynthesizer};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

struct DriverHandle {
    call_id: Uuid,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Current (or last) call plus its driver, if one is running
struct CallSlot {
    state: Arc<CallState>,
    driver: Option<DriverHandle>,
}

/// A voice-driven conversation with an assistant
///
/// Listens continuously, turns each finalized utterance into a chat turn,
/// asks the completion service for a reply and speaks it back. Callers
/// observe the call through one handler per [`EventKind`].
pub struct VoiceCall {
    config: CallConfig,
    recognizer: Option<SharedRecognizer>,
    speaker: Speaker,
    completion: Arc<dyn CompletionService>,
    events: EventBus,
    slot: Mutex<CallSlot>,
}

impl VoiceCall {
    /// Create a call handle
    ///
    /// Pass `None` as recognizer when the platform has no speech recognition;
    /// `start` then fails with [`CallError::CaptureUnavailable`].
    pub fn new(
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        completion: Arc<dyn CompletionService>,
        config: CallConfig,
    ) -> Self {
        let events = EventBus::new();
        let speaker = Speaker::new(synthesizer, config.voice.clone(), events.clone());

        Self {
            config,
            recognizer: recognizer.map(|r| Arc::new(Mutex::new(r))),
            speaker,
            completion,
            events,
            slot: Mutex::new(CallSlot {
                state: Arc::new(CallState::idle()),
                driver: None,
            }),
        }
    }

    /// Register the handler for `kind`, replacing any previous one
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&CallEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, handler);
    }

    pub fn off(&self, kind: EventKind) {
        self.events.off(kind);
    }

    /// Start a call with `assistant`, filling its prompt placeholders from `variables`
    pub async fn start(
        &self,
        assistant: AssistantConfig,
        variables: &VariableValues,
    ) -> Result<(), CallError> {
        let mut slot = self.slot.lock().await;

        if let Some(driver) = &slot.driver {
            warn!("Call {} already in progress", driver.call_id);
            return Err(self.fail(CallError::AlreadyActive));
        }

        let Some(recognizer) = &self.recognizer else {
            warn!("Speech recognition not supported on this platform");
            return Err(self.fail(CallError::CaptureUnavailable));
        };

        let call_id = Uuid::new_v4();
        info!("Starting call {} with assistant {}", call_id, assistant.name);

        let system = substitute(&assistant.system_prompt, variables);
        let state = Arc::new(CallState::started(ChatTurn::system(system)));

        self.events.emit(CallEvent::CallStarted);

        let capture = {
            let mut recognizer = recognizer.lock().await;
            match recognizer.start(&self.config.recognition).await {
                Ok(rx) => {
                    state.listening.store(true, Ordering::SeqCst);
                    state.capturing.store(true, Ordering::SeqCst);
                    info!("Speech capture started ({})", recognizer.name());
                    Some(rx)
                }
                Err(e) => {
                    error!("Failed to start speech recognition: {:#}", e);
                    self.events
                        .emit(CallEvent::Error(CallError::Capture(e.to_string())));
                    None
                }
            }
        };

        let opening = assistant.first_message.map(|text| Opening {
            text,
            delay: self.config.opening_delay,
        });

        let driver = CallDriver {
            call_id,
            state: Arc::clone(&state),
            preset_turns: assistant.preset_turns,
            recognizer: Arc::clone(recognizer),
            recognition: self.config.recognition.clone(),
            speaker: self.speaker.clone(),
            completion: Arc::clone(&self.completion),
            events: self.events.clone(),
            fallback_reply: self.config.fallback_reply.clone(),
            completion_timeout: self.config.completion_timeout,
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(driver.run(capture, opening, shutdown_rx));

        slot.state = state;
        slot.driver = Some(DriverHandle {
            call_id,
            shutdown_tx,
            task,
        });

        Ok(())
    }

    /// End the call; safe to call at any time, any number of times
    pub async fn stop(&self) {
        let mut slot = self.slot.lock().await;
        let state = Arc::clone(&slot.state);

        state.listening.store(false, Ordering::SeqCst);
        state.capturing.store(false, Ordering::SeqCst);
        state.processing.store(false, Ordering::SeqCst);

        if let Some(driver) = slot.driver.take() {
            info!("Stopping call {}", driver.call_id);
            state.stopped.store(true, Ordering::SeqCst);
            driver.shutdown_tx.send(()).ok();
            if let Err(e) = driver.task.await {
                error!("Call driver panicked: {}", e);
            }
        }
        drop(slot);

        if let Some(recognizer) = &self.recognizer {
            if let Err(e) = recognizer.lock().await.stop().await {
                warn!("Failed to stop speech recognition: {:#}", e);
            }
        }

        if let Err(e) = self.speaker.cancel().await {
            warn!("Failed to cancel speech playback: {:#}", e);
        }

        self.events.emit(CallEvent::CallEnded);
    }

    /// Conversation so far, system turn first
    pub async fn history(&self) -> Vec<ChatTurn> {
        let state = Arc::clone(&self.slot.lock().await.state);
        let history = state.history.lock().await;
        history.clone()
    }

    pub async fn phase(&self) -> CallPhase {
        self.slot.lock().await.state.phase()
    }

    /// Get current call statistics
    pub async fn stats(&self) -> CallStats {
        let state = Arc::clone(&self.slot.lock().await.state);
        state.stats().await
    }

    fn fail(&self, error: CallError) -> CallError {
        self.events.emit(CallEvent::Error(error.clone()));
        error
    }
}
