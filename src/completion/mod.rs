//! Chat completion plumbing
//!
//! Conversation turns, the `CompletionService` seam a voice call talks to,
//! and the HTTP client for the `/api/chat` relay.

mod client;
pub mod messages;

pub use client::{CompletionService, HttpCompletionClient, EMPTY_REPLY};
pub use messages::{ChatTurn, CompletionRequest, CompletionResponse, ErrorResponse, Role};
