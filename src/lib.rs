pub mod cli;
pub mod core;

// Re-export for convenience
pub use crate::core::dictionary::{Dictionary, DictionaryError, DictionarySource};
pub use crate::core::game::{GameConfig, GuessOutcome, Phase, RevealGame};
pub use crate::core::session::Session;
