pub mod assistant;
pub mod call;
pub mod completion;
pub mod config;
pub mod error;
pub mod http;
pub mod speech;

pub use assistant::{format_questions, interviewer, substitute, AssistantConfig, VariableValues};
pub use call::{
    CallConfig, CallEvent, CallPhase, CallStats, EventKind, TranscriptMessage, VoiceCall,
};
pub use completion::{ChatTurn, CompletionService, HttpCompletionClient, Role};
pub use config::Config;
pub use error::{CallError, CompletionError};
pub use http::{create_router, AppState, TextGenerator, UpstreamGenerator};
pub use speech::{
    ChannelRecognizer, ConsoleSynthesizer, RecognizerFeed, SpeechRecognizer, SpeechSynthesizer,
};
