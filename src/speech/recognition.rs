use anyhow::Result;
use tokio::sync::mpsc;

/// Settings applied to every capture run
#[derive(Debug, Clone)]
pub struct RecognitionOptions {
    /// BCP 47 language tag
    pub language: String,
    /// Keep capturing across pauses instead of stopping after one phrase
    pub continuous: bool,
    /// Deliver interim (non-final) hypotheses as well
    pub interim_results: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// One recognized hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

/// A delivery of recognition results
///
/// `results` holds every result of the current capture run; only entries from
/// `result_index` onward are new in this delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultBatch {
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

impl ResultBatch {
    /// Batch holding a single new result
    pub fn single(transcript: impl Into<String>, is_final: bool) -> Self {
        Self {
            result_index: 0,
            results: vec![RecognitionResult {
                transcript: transcript.into(),
                is_final,
            }],
        }
    }

    /// Split the new results into (finalized, interim) text
    pub fn split(&self) -> (String, String) {
        let mut finalized = String::new();
        let mut interim = String::new();

        for result in self.results.iter().skip(self.result_index) {
            if result.is_final {
                finalized.push_str(&result.transcript);
            } else {
                interim.push_str(&result.transcript);
            }
        }

        (finalized, interim)
    }
}

/// Notifications from a capture run
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Started,
    Results(ResultBatch),
    /// Platform error code, e.g. "not-allowed" or "network"
    Error(String),
    /// The run halted (silence, platform timeout, or `stop`)
    Ended,
}

/// Speech-to-text capture backend
///
/// Each `start` begins a new capture run whose events arrive on the returned
/// receiver. A run ends with `RecognitionEvent::Ended` or by closing the
/// receiver; the caller decides whether to start another.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begin a capture run
    async fn start(
        &mut self,
        options: &RecognitionOptions,
    ) -> Result<mpsc::UnboundedReceiver<RecognitionEvent>>;

    /// Halt the current run, if any
    async fn stop(&mut self) -> Result<()>;

    /// Check if a run is currently active
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
