use super::events::{CallEvent, EventBus, TranscriptMessage};
use super::speaker::Speaker;
use super::state::CallState;
use crate::completion::{ChatTurn, CompletionService, Role};
use crate::error::{CallError, CompletionError};
use crate::speech::{RecognitionEvent, RecognitionOptions, ResultBatch, SpeechRecognizer};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

pub(crate) type SharedRecognizer = Arc<Mutex<Box<dyn SpeechRecognizer>>>;

type Capture = Option<mpsc::UnboundedReceiver<RecognitionEvent>>;
type InFlight = Option<JoinHandle<Result<String, CompletionError>>>;

/// Opening line spoken once the audio stack has settled
pub(crate) struct Opening {
    pub text: String,
    pub delay: Duration,
}

/// Turn loop of one call
///
/// Runs as a single task that owns every transition: capture events,
/// completion outcomes, the opening timer and shutdown are all handled here,
/// one at a time.
pub(crate) struct CallDriver {
    pub call_id: Uuid,
    pub state: Arc<CallState>,
    pub preset_turns: Vec<ChatTurn>,
    pub recognizer: SharedRecognizer,
    pub recognition: RecognitionOptions,
    pub speaker: Speaker,
    pub completion: Arc<dyn CompletionService>,
    pub events: EventBus,
    pub fallback_reply: String,
    pub completion_timeout: Option<Duration>,
}

impl CallDriver {
    pub async fn run(
        self,
        mut capture: Capture,
        mut opening: Option<Opening>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        info!("Call {} driver started", self.call_id);

        let delay = opening.as_ref().map(|o| o.delay).unwrap_or_default();
        let opening_timer = tokio::time::sleep(delay);
        tokio::pin!(opening_timer);

        let mut in_flight: InFlight = None;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,

                _ = &mut opening_timer, if opening.is_some() => {
                    if let Some(opening) = opening.take() {
                        self.speak_opening(opening.text).await;
                    }
                }

                event = next_capture_event(&mut capture) => {
                    self.on_capture_event(event, &mut capture, &mut in_flight).await;
                }

                outcome = next_outcome(&mut in_flight) => {
                    self.finish_turn(outcome).await;
                }
            }
        }

        if in_flight.is_some() {
            // The request is left to finish; its reply is discarded
            info!("Call {} stopped with a completion still in flight", self.call_id);
        }
        info!("Call {} driver stopped", self.call_id);
    }

    async fn speak_opening(&self, text: String) {
        self.speaker.speak(&text).await;
        self.events.emit(CallEvent::Message(TranscriptMessage::final_transcript(
            Role::Assistant,
            text,
        )));
    }

    async fn on_capture_event(
        &self,
        event: RecognitionEvent,
        capture: &mut Capture,
        in_flight: &mut InFlight,
    ) {
        match event {
            RecognitionEvent::Started => debug!("Speech recognition started"),
            RecognitionEvent::Results(batch) => self.on_results(batch, in_flight).await,
            RecognitionEvent::Error(code) => {
                error!("Speech recognition error: {}", code);
                self.events.emit(CallEvent::Error(CallError::Capture(code)));
            }
            RecognitionEvent::Ended => {
                *capture = None;
                self.state.capturing.store(false, Ordering::SeqCst);
                self.restart_capture(capture).await;
            }
        }
    }

    async fn restart_capture(&self, capture: &mut Capture) {
        if !self.state.listening.load(Ordering::SeqCst) {
            debug!("Speech recognition ended");
            return;
        }

        let mut recognizer = self.recognizer.lock().await;
        match recognizer.start(&self.recognition).await {
            Ok(rx) => {
                *capture = Some(rx);
                self.state.capturing.store(true, Ordering::SeqCst);
                self.state.capture_restarts.fetch_add(1, Ordering::SeqCst);
                info!("Restarted speech recognition ({})", recognizer.name());
            }
            Err(e) => error!("Recognition restart failed, capture is down: {:#}", e),
        }
    }

    async fn on_results(&self, batch: ResultBatch, in_flight: &mut InFlight) {
        let (finalized, interim) = batch.split();
        if !interim.is_empty() {
            debug!("Interim transcript: {}", interim);
        }

        let utterance = finalized.trim();
        if utterance.is_empty() {
            return;
        }

        if self.state.processing.load(Ordering::SeqCst) {
            info!("Already processing, dropping utterance: {}", utterance);
            self.state.utterances_dropped.fetch_add(1, Ordering::SeqCst);
            return;
        }

        self.begin_turn(utterance.to_string(), in_flight).await;
    }

    async fn begin_turn(&self, utterance: String, in_flight: &mut InFlight) {
        self.state.processing.store(true, Ordering::SeqCst);
        info!("Processing user input: {}", utterance);

        self.events.emit(CallEvent::Message(TranscriptMessage::final_transcript(
            Role::User,
            utterance.as_str(),
        )));

        let request = {
            let mut history = self.state.history.lock().await;
            history.push(ChatTurn::user(utterance));
            self.outbound(&history)
        };

        let completion = Arc::clone(&self.completion);
        let limit = self.completion_timeout;
        *in_flight = Some(tokio::spawn(async move {
            match limit {
                Some(limit) => tokio::time::timeout(limit, completion.complete(&request))
                    .await
                    .unwrap_or(Err(CompletionError::Timeout(limit))),
                None => completion.complete(&request).await,
            }
        }));
    }

    /// System turn, then preset turns, then the rest of the history
    fn outbound(&self, history: &[ChatTurn]) -> Vec<ChatTurn> {
        let mut turns = Vec::with_capacity(history.len() + self.preset_turns.len());
        if let Some((system, rest)) = history.split_first() {
            turns.push(system.clone());
            turns.extend(self.preset_turns.iter().cloned());
            turns.extend(rest.iter().cloned());
        }
        turns
    }

    async fn finish_turn(&self, outcome: Result<String, CompletionError>) {
        match outcome {
            Ok(reply) => {
                self.state
                    .history
                    .lock()
                    .await
                    .push(ChatTurn::assistant(reply.as_str()));
                self.state.turns_completed.fetch_add(1, Ordering::SeqCst);

                self.events.emit(CallEvent::Message(TranscriptMessage::final_transcript(
                    Role::Assistant,
                    reply.as_str(),
                )));
                self.speaker.speak(&reply).await;
            }
            Err(e) => {
                error!("Error processing user input: {}", e);
                self.state.completion_failures.fetch_add(1, Ordering::SeqCst);

                self.speaker.speak(&self.fallback_reply).await;
                self.events.emit(CallEvent::Error(CallError::Completion(e)));
            }
        }

        self.state.processing.store(false, Ordering::SeqCst);
    }
}

/// Next event of the current capture run; a closed run reads as `Ended`
async fn next_capture_event(capture: &mut Capture) -> RecognitionEvent {
    match capture {
        Some(rx) => rx.recv().await.unwrap_or(RecognitionEvent::Ended),
        None => std::future::pending().await,
    }
}

async fn next_outcome(in_flight: &mut InFlight) -> Result<String, CompletionError> {
    match in_flight {
        Some(handle) => {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(CompletionError::Transport(format!(
                    "completion task failed: {}",
                    e
                ))),
            };
            *in_flight = None;
            outcome
        }
        None => std::future::pending().await,
    }
}
