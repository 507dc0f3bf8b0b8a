//! Voice call management
//!
//! This module provides the `VoiceCall` abstraction that manages:
//! - Continuous speech capture, restarted whenever it halts mid-call
//! - Turn-taking: one user → assistant round trip in flight at a time
//! - Completion requests carrying the full conversation history
//! - Spoken replies, with a fallback apology when a round trip fails
//! - Call events for the UI layer (call, message, speech, error)

mod config;
mod driver;
mod events;
mod session;
mod speaker;
mod state;
mod stats;

pub use config::{CallConfig, VoiceSettings, FALLBACK_REPLY};
pub use events::{
    CallEvent, EventBus, EventHandler, EventKind, MessageType, TranscriptMessage, TranscriptType,
};
pub use session::VoiceCall;
pub use stats::{CallPhase, CallStats};
