use super::stats::{CallPhase, CallStats};
use crate::completion::ChatTurn;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// State shared between a call handle and its driver task
pub(crate) struct CallState {
    pub started_at: Option<DateTime<Utc>>,

    /// Set once the call stops; terminal until the next start
    pub stopped: AtomicBool,

    /// Whether capture should be running; gates auto-restart
    pub listening: AtomicBool,

    /// Whether a capture run is actually active
    pub capturing: AtomicBool,

    /// True while a round trip is in flight
    pub processing: AtomicBool,

    /// `history[0]` is the system turn
    pub history: Mutex<Vec<ChatTurn>>,

    pub turns_completed: AtomicUsize,
    pub utterances_dropped: AtomicUsize,
    pub completion_failures: AtomicUsize,
    pub capture_restarts: AtomicUsize,
}

impl CallState {
    /// State of a handle that has never started a call
    pub fn idle() -> Self {
        Self::with_history(None, Vec::new())
    }

    /// Fresh state for a call seeded with its system turn
    pub fn started(system: ChatTurn) -> Self {
        Self::with_history(Some(Utc::now()), vec![system])
    }

    fn with_history(started_at: Option<DateTime<Utc>>, history: Vec<ChatTurn>) -> Self {
        Self {
            started_at,
            stopped: AtomicBool::new(false),
            listening: AtomicBool::new(false),
            capturing: AtomicBool::new(false),
            processing: AtomicBool::new(false),
            history: Mutex::new(history),
            turns_completed: AtomicUsize::new(0),
            utterances_dropped: AtomicUsize::new(0),
            completion_failures: AtomicUsize::new(0),
            capture_restarts: AtomicUsize::new(0),
        }
    }

    pub fn phase(&self) -> CallPhase {
        if self.started_at.is_none() {
            CallPhase::Idle
        } else if self.stopped.load(Ordering::SeqCst) {
            CallPhase::Stopped
        } else if self.processing.load(Ordering::SeqCst) {
            CallPhase::Processing
        } else if self.listening.load(Ordering::SeqCst)
            && self.capturing.load(Ordering::SeqCst)
        {
            CallPhase::Listening
        } else {
            CallPhase::Starting
        }
    }

    pub async fn stats(&self) -> CallStats {
        let duration_secs = self
            .started_at
            .map(|at| Utc::now().signed_duration_since(at).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        CallStats {
            phase: self.phase(),
            capturing: self.capturing.load(Ordering::SeqCst),
            started_at: self.started_at,
            duration_secs,
            turns_completed: self.turns_completed.load(Ordering::SeqCst),
            utterances_dropped: self.utterances_dropped.load(Ordering::SeqCst),
            completion_failures: self.completion_failures.load(Ordering::SeqCst),
            capture_restarts: self.capture_restarts.load(Ordering::SeqCst),
            history_len: self.history.lock().await.len(),
        }
    }
}
