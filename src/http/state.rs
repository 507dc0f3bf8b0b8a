use super::generator::TextGenerator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Follow-ups used when generation fails, so the interview keeps moving
pub const FALLBACK_RESPONSES: [&str; 7] = [
    "That's an interesting point. Can you tell me more about your experience with that?",
    "I see. What challenges did you face in that situation?",
    "Good. How did you handle that responsibility?",
    "Interesting. What would you do differently next time?",
    "I understand. Can you give me a specific example?",
    "That's good to hear. What skills did you develop from that experience?",
    "Thank you for sharing that. How do you think that experience prepared you for this role?",
];

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    fallback_cursor: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            fallback_cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Next canned follow-up, in rotation
    pub fn next_fallback(&self) -> &'static str {
        let index = self.fallback_cursor.fetch_add(1, Ordering::Relaxed);
        FALLBACK_RESPONSES[index % FALLBACK_RESPONSES.len()]
    }
}
