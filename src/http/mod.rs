//! Chat relay HTTP server
//!
//! The completion endpoint voice calls talk to:
//! - POST /api/chat - Next interviewer line for a conversation
//! - GET /health - Health check

mod generator;
mod handlers;
mod routes;
mod state;

pub use generator::{TextGenerator, UpstreamConfig, UpstreamGenerator};
pub use handlers::{build_prompt, valid_turns};
pub use routes::create_router;
pub use state::{AppState, FALLBACK_RESPONSES};
