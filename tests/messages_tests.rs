use interview_voice::call::{CallPhase, CallStats, TranscriptMessage};
use interview_voice::completion::{ChatTurn, CompletionRequest, Role};

#[test]
fn test_completion_request_serialization() {
    let request = CompletionRequest {
        messages: vec![
            ChatTurn::system("Interview for Engineer."),
            ChatTurn::user("I am ready."),
            ChatTurn::assistant("Great, let's begin."),
        ],
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"role\":\"system\""));
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("\"role\":\"assistant\""));
    assert!(json.contains("\"content\":\"I am ready.\""));
}

#[test]
fn test_chat_turn_rejects_unknown_role() {
    let json = r#"{ "role": "tool", "content": "x" }"#;
    assert!(serde_json::from_str::<ChatTurn>(json).is_err());
}

#[test]
fn test_transcript_message_deserialization() {
    let json = r#"{
        "type": "transcript",
        "transcriptType": "final",
        "role": "user",
        "transcript": "I am ready."
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.transcript, "I am ready.");
}

#[test]
fn test_call_stats_serialization() {
    let stats = CallStats {
        phase: CallPhase::Listening,
        capturing: true,
        started_at: None,
        duration_secs: 12.5,
        turns_completed: 3,
        utterances_dropped: 1,
        completion_failures: 0,
        capture_restarts: 2,
        history_len: 7,
    };

    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"phase\":\"listening\""));
    assert!(json.contains("\"capturing\":true"));
    assert!(json.contains("\"turns_completed\":3"));
    assert!(json.contains("\"started_at\":null"));
}
