//! Skribbl Engine
//!
//! Browser-independent core of the skribbl bot: page phase classification,
//! hint parsing and candidate filtering, guess timing, and word encounter
//! statistics. Callers supply observations read from the page; nothing in
//! this crate touches a browser.

pub mod candidates;
pub mod encounters;
pub mod hint;
pub mod phase;
pub mod schedule;

// Re-export commonly used types
pub use candidates::{RoundGuessedWords, Vocabulary, VocabularyError};
pub use encounters::{EncounterLog, EncounterLogError, FrequencyReport, WordFrequency};
pub use hint::{HintCell, HintError, WordHint};
pub use phase::{
    GAME_PHASE_PRIORITY, GamePhase, GameSignals, OverlayRule, OverlayState, PhaseCheck,
    PhaseTracker, SCREEN_ORDER, Screen, ScreenVisibility, Transition, WebsitePhase,
    classify_game, classify_website,
};
pub use schedule::{DelayBucket, DelayRange, GUESS_DELAY_RANGES, pick_candidate};

/// Delimiter joining the two words picked in combination word mode.
pub const COMBINATION_DELIMITER: &str = "+";

/// Join the words chosen on a word-selection screen into the answer text.
#[must_use]
pub fn combined_answer<S: AsRef<str>>(words: &[S], delimiter: &str) -> String {
    words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<&str>>()
        .join(delimiter)
}
