use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a call is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPhase {
    Idle,
    /// Call is up but no capture run is active
    Starting,
    Listening,
    Processing,
    Stopped,
}

/// Statistics about a voice call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStats {
    pub phase: CallPhase,

    /// Whether speech capture is currently running
    pub capturing: bool,

    /// When the current (or last) call started; `None` before the first start
    pub started_at: Option<DateTime<Utc>>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Completed user → assistant round trips
    pub turns_completed: usize,

    /// Finalized utterances discarded because a turn was in flight
    pub utterances_dropped: usize,

    /// Round trips that ended with the fallback reply
    pub completion_failures: usize,

    /// Times capture was restarted after halting on its own
    pub capture_restarts: usize,

    /// Entries in the conversation history, system turn included
    pub history_len: usize,
}
