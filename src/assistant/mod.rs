//! Assistant presets and system prompt templating

mod preset;
mod template;

pub use preset::{interviewer, AssistantConfig};
pub use template::{format_questions, substitute, VariableValues};
