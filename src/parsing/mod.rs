pub mod classifier;
pub mod speaker;

pub use classifier::classify_line;
pub use speaker::extract_speaker_and_utterance;
