//! Speech capture and playback capabilities
//!
//! A voice call only sees these traits:
//! - `SpeechRecognizer`: continuous speech-to-text capture runs
//! - `SpeechSynthesizer`: text-to-speech playback with a voice catalog
//!
//! `ChannelRecognizer` and `ConsoleSynthesizer` back the terminal client and tests.

mod channel;
mod console;
pub mod recognition;
pub mod synthesis;

pub use channel::{ChannelRecognizer, RecognizerFeed};
pub use console::ConsoleSynthesizer;
pub use recognition::{
    RecognitionEvent, RecognitionOptions, RecognitionResult, ResultBatch, SpeechRecognizer,
};
pub use synthesis::{
    select_voice, SpeechSynthesizer, SynthesisEvent, Utterance, Voice, VoiceGender,
};
