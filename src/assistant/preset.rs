use crate::completion::ChatTurn;
use serde::{Deserialize, Serialize};

const INTERVIEWER_FIRST_MESSAGE: &str = "Hello! Thank you for taking the time to speak with me today. I'm excited to learn more about you and your experience. Let's begin with our first question.";

const INTERVIEWER_SYSTEM_PROMPT: &str = r#"You are a professional job interviewer conducting a real-time voice interview with a candidate. Your goal is to assess their qualifications, motivation, and fit for the role.

IMPORTANT INTERVIEW RULES:
1. Ask questions from this specific list ONE AT A TIME:
{{questions}}

2. ALWAYS wait for the candidate's complete response before asking the next question
3. Do NOT continue talking or answer for the candidate
4. Listen actively and acknowledge their response briefly before moving to the next question
5. Ask brief clarifying follow-up questions only if their response is unclear
6. Keep your responses SHORT and conversational (this is voice, not text)

Interview Flow:
- Start with the first question from the list
- Wait for their full response
- Give brief acknowledgment (e.g., "Thank you for that insight")
- Move to the next question
- Continue until all questions are covered

Professional Guidelines:
- Be warm but professional
- Keep responses under 2 sentences
- Don't ramble or give long explanations
- Focus on listening, not talking
- End professionally when all questions are complete

Remember: Your primary job is to ASK questions and LISTEN, not to dominate the conversation."#;

/// Assistant configuration handed to a call at start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Display name (e.g., "Interviewer")
    pub name: String,

    /// Spoken once, shortly after the call starts
    #[serde(default)]
    pub first_message: Option<String>,

    /// System prompt with `{{placeholder}}` slots
    pub system_prompt: String,

    /// Static turns sent after the system turn on every request
    #[serde(default)]
    pub preset_turns: Vec<ChatTurn>,
}

/// The built-in mock interviewer
pub fn interviewer() -> AssistantConfig {
    AssistantConfig {
        name: "Interviewer".to_string(),
        first_message: Some(INTERVIEWER_FIRST_MESSAGE.to_string()),
        system_prompt: INTERVIEWER_SYSTEM_PROMPT.to_string(),
        preset_turns: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interviewer_has_questions_slot() {
        let assistant = interviewer();
        assert!(assistant.system_prompt.contains("{{questions}}"));
        assert!(assistant.first_message.is_some());
        assert!(assistant.preset_turns.is_empty());
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{ "name": "Screener", "system_prompt": "Ask about {{topic}}." }"#;
        let assistant: AssistantConfig = serde_json::from_str(json).unwrap();
        assert_eq!(assistant.name, "Screener");
        assert_eq!(assistant.first_message, None);
        assert!(assistant.preset_turns.is_empty());
    }
}
