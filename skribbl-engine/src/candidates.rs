//! Vocabulary loading and hint-driven candidate filtering.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::hint::{HintError, WordHint};

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read word list {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {0} contains no words")]
    Empty(String),
}

/// Lowercase candidate words, loaded once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Parse a newline-delimited word list. Lines are trimmed and lowercased;
    /// blanks and repeats are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut seen = HashSet::new();
        let words = text
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .filter(|word| seen.insert(word.clone()))
            .collect();
        Self { words }
    }

    /// Load a word list from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no words.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| VocabularyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let vocabulary = Self::parse(&text);
        if vocabulary.is_empty() {
            return Err(VocabularyError::Empty(path.display().to_string()));
        }
        Ok(vocabulary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Words consistent with `hint` that have not been guessed this round.
    /// An empty result is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the hint is empty or its pattern fails to compile.
    pub fn candidates(
        &self,
        hint: &WordHint,
        guessed: &RoundGuessedWords,
    ) -> Result<Vec<&str>, HintError> {
        let pattern = hint.pattern()?;
        Ok(self
            .iter()
            .filter(|word| pattern.is_match(word))
            .filter(|word| !guessed.contains(word))
            .collect())
    }
}

impl<'a> FromIterator<&'a str> for Vocabulary {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let joined: Vec<&str> = iter.into_iter().collect();
        Self::parse(&joined.join("\n"))
    }
}

/// Words already submitted during the current round.
#[derive(Debug, Clone, Default)]
pub struct RoundGuessedWords {
    words: HashSet<String>,
}

impl RoundGuessedWords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a guess. Returns `false` if it was already recorded.
    pub fn insert(&mut self, word: &str) -> bool {
        self.words.insert(word.to_lowercase())
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_and_dedupes() {
        let vocab = Vocabulary::parse("Apple\n\n  banana \napple\r\nCherry\n");
        let words: Vec<&str> = vocab.iter().collect();
        assert_eq!(words, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Vocabulary::load("/definitely/not/here.txt").expect_err("missing");
        assert!(err.to_string().contains("failed to read word list"));
    }

    #[test]
    fn load_rejects_blank_file() {
        let path = std::env::temp_dir().join(format!(
            "skribbl-vocab-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&path, "\n \n").unwrap();
        let err = Vocabulary::load(&path).expect_err("blank");
        assert!(matches!(err, VocabularyError::Empty(_)));
    }

    #[test]
    fn candidates_respect_hint_and_exclusions() {
        let vocab: Vocabulary = ["hello", "world", "helix", "jello"].into_iter().collect();
        let mut guessed = RoundGuessedWords::new();
        let hint = WordHint::parse("_e__o");

        let found = vocab.candidates(&hint, &guessed).unwrap();
        assert_eq!(found, vec!["hello", "jello"]);

        assert!(guessed.insert("hello"));
        let found = vocab.candidates(&hint, &guessed).unwrap();
        assert_eq!(found, vec!["jello"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let vocab: Vocabulary = ["cat", "dog"].into_iter().collect();
        let found = vocab
            .candidates(&WordHint::parse("____"), &RoundGuessedWords::new())
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn round_words_never_duplicate() {
        let mut guessed = RoundGuessedWords::new();
        assert!(guessed.insert("apple"));
        assert!(!guessed.insert("apple"));
        assert!(!guessed.insert("APPLE"));
        assert_eq!(guessed.len(), 1);
        guessed.clear();
        assert!(guessed.is_empty());
        assert!(!guessed.contains("apple"));
    }
}
