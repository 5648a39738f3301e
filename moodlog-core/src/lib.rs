pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sentiment;
pub mod speech;
pub mod store;

pub use config::MoodlogConfig;
pub use error::{JournalError, MoodlogError};
pub use models::entry::JournalEntry;
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use speech::{HttpSpeechRecognizer, SpeechConfig, SpeechError, SpeechRecognizer};
pub use store::EntryStore;
