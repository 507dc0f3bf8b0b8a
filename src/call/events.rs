use crate::completion::Role;
use crate::error::CallError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

/// Event slots a caller can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CallStart,
    CallEnd,
    Message,
    SpeechStart,
    SpeechEnd,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::CallStart,
        EventKind::CallEnd,
        EventKind::Message,
        EventKind::SpeechStart,
        EventKind::SpeechEnd,
        EventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::CallStart => "call-start",
            EventKind::CallEnd => "call-end",
            EventKind::Message => "message",
            EventKind::SpeechStart => "speech-start",
            EventKind::SpeechEnd => "speech-end",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown event kind: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Transcript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Final,
}

/// Payload of the `message` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub transcript_type: TranscriptType,
    pub role: Role,
    pub transcript: String,
}

impl TranscriptMessage {
    /// Final transcript line spoken by `role`
    pub fn final_transcript(role: Role, transcript: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Transcript,
            transcript_type: TranscriptType::Final,
            role,
            transcript: transcript.into(),
        }
    }
}

/// Everything a call reports to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    CallStarted,
    CallEnded,
    Message(TranscriptMessage),
    SpeechStarted,
    SpeechEnded,
    Error(CallError),
}

impl CallEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CallEvent::CallStarted => EventKind::CallStart,
            CallEvent::CallEnded => EventKind::CallEnd,
            CallEvent::Message(_) => EventKind::Message,
            CallEvent::SpeechStarted => EventKind::SpeechStart,
            CallEvent::SpeechEnded => EventKind::SpeechEnd,
            CallEvent::Error(_) => EventKind::Error,
        }
    }
}

pub type EventHandler = Arc<dyn Fn(&CallEvent) + Send + Sync>;

/// One handler slot per event kind
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<EventKind, EventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous one
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&CallEvent) + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Arc::new(handler));
    }

    pub fn off(&self, kind: EventKind) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
    }

    pub fn emit(&self, event: CallEvent) {
        // Handlers may re-register, so call outside the lock
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.kind())
            .cloned();

        if let Some(handler) = handler {
            handler(&event);
        }
    }
}
