// Shared test doubles for voice call tests

#![allow(dead_code)]

use anyhow::Result;
use interview_voice::call::{CallConfig, CallEvent, EventKind};
use interview_voice::completion::{ChatTurn, CompletionService};
use interview_voice::error::CompletionError;
use interview_voice::speech::{
    ChannelRecognizer, RecognizerFeed, SpeechSynthesizer, SynthesisEvent, Utterance, Voice,
};
use interview_voice::VoiceCall;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// Completion service that answers from a script
///
/// With a gate, every request waits for a permit before answering, which
/// keeps a turn in flight for as long as the test needs.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<Vec<ChatTurn>>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn gated(replies: Vec<Result<String, CompletionError>>, gate: Arc<Semaphore>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatTurn>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(turns.to_vec());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Please go on.".to_string()))
    }
}

/// Synthesizer that records utterances and finishes playback immediately
#[derive(Default)]
pub struct RecordingSynthesizer {
    voices: Vec<Voice>,
    spoken: Mutex<Vec<Utterance>>,
    cancels: AtomicUsize,
    fail_with: Option<String>,
}

impl RecordingSynthesizer {
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    /// Every playback reports `message` as a synthesis error
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: Utterance) -> Result<mpsc::UnboundedReceiver<SynthesisEvent>> {
        self.spoken.lock().unwrap().push(utterance);

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(SynthesisEvent::Started).ok();
        match &self.fail_with {
            Some(message) => tx.send(SynthesisEvent::Error(message.clone())).ok(),
            None => tx.send(SynthesisEvent::Ended).ok(),
        };
        Ok(rx)
    }

    async fn cancel(&self) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Every event a call emitted, in order
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<CallEvent>>>,
}

impl EventLog {
    pub fn attach(call: &VoiceCall) -> Self {
        let log = Self::default();
        for kind in EventKind::ALL {
            let events = Arc::clone(&log.events);
            call.on(kind, move |event| events.lock().unwrap().push(event.clone()));
        }
        log
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events().iter().filter(|e| e.kind() == kind).count()
    }

    /// Transcript texts of message events, tagged with their role
    pub fn messages(&self) -> Vec<(interview_voice::Role, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CallEvent::Message(m) => Some((m.role, m.transcript)),
                _ => None,
            })
            .collect()
    }

    /// Poll until `condition` holds, failing the test after two seconds
    pub async fn wait_until<F>(&self, what: &str, condition: F)
    where
        F: Fn(&[CallEvent]) -> bool,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            if condition(&self.events()) {
                return;
            }
            if tokio::time::Instant::now() > deadline {
                panic!("timed out waiting for {}: {:?}", what, self.events());
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// Call config with a short opening delay so tests stay fast
pub fn fast_config() -> CallConfig {
    CallConfig {
        opening_delay: Duration::from_millis(20),
        ..CallConfig::default()
    }
}

pub struct Harness {
    pub call: VoiceCall,
    pub feed: RecognizerFeed,
    pub synthesizer: Arc<RecordingSynthesizer>,
    pub completion: Arc<ScriptedCompletion>,
    pub log: EventLog,
}

impl Harness {
    pub fn new(completion: ScriptedCompletion) -> Self {
        Self::with_parts(completion, RecordingSynthesizer::default(), fast_config())
    }

    pub fn with_parts(
        completion: ScriptedCompletion,
        synthesizer: RecordingSynthesizer,
        config: CallConfig,
    ) -> Self {
        let (recognizer, feed) = ChannelRecognizer::new();
        let synthesizer = Arc::new(synthesizer);
        let completion = Arc::new(completion);
        let call = VoiceCall::new(
            Some(Box::new(recognizer)),
            synthesizer.clone(),
            completion.clone(),
            config,
        );
        let log = EventLog::attach(&call);

        Self {
            call,
            feed,
            synthesizer,
            completion,
            log,
        }
    }

    /// Wait until `n` completion outcomes (replies or failures) have been handled
    pub async fn wait_for_turns(&self, n: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let stats = self.call.stats().await;
            if stats.turns_completed + stats.completion_failures >= n
                && !matches!(stats.phase, interview_voice::CallPhase::Processing)
            {
                return;
            }
            if tokio::time::Instant::now() > deadline {
                panic!("timed out waiting for {} turns: {:?}", n, stats);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// Poll a synchronous condition, failing the test after two seconds
pub async fn eventually<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {}", what);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
