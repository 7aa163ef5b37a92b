//! Voice input and output
//!
//! - Host capability traits for recognition and synthesis
//! - Voice selection heuristic
//! - Adapters that turn host engines into transcripts and spoken replies

pub mod config;
pub mod host;
pub mod input;
pub mod output;
pub mod scripted;
pub mod voice_select;

pub use config::VoiceConfig;
pub use host::{
    HostCapabilities, ListenerId, RecognitionEvent, RecognitionOptions, SpeechRecognizer,
    SpeechSynthesizer, Utterance, Voice, VoicesListener,
};
pub use input::{ListenOutcome, VoiceInputAdapter};
pub use output::VoiceOutputAdapter;
pub use voice_select::select_voice;
