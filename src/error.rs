use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by a voice call through its error event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// The platform offers no speech recognizer; the call cannot listen.
    #[error("speech recognition is not available on this platform")]
    CaptureUnavailable,

    /// The recognizer reported a runtime error (permission denied, network loss, ...).
    #[error("speech recognition error: {0}")]
    Capture(String),

    /// The completion round trip failed; a fallback reply was spoken instead.
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    /// Playback of an utterance failed.
    #[error("speech synthesis error: {0}")]
    Synthesis(String),

    /// `start()` was called while another call is still running.
    #[error("a call is already in progress")]
    AlreadyActive,
}

/// Failures of a single request to the completion service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API request failed: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}
