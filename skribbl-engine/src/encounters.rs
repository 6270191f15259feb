//! Word encounter log and its offline frequency aggregation.
//!
//! The live log is append-only: one raw word per line, one line per
//! occurrence. Counting happens only when the log is collated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncounterLogError {
    #[error("failed to open encounter log {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write encounter log {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read encounter log: {0}")]
    Read(#[from] std::io::Error),
    #[error("encounter log holds no words")]
    Empty,
}

/// Appends observed words to the on-disk log. Shared between bots; each
/// batch is written under a lock so lines from two writers never interleave.
#[derive(Debug)]
pub struct EncounterLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl EncounterLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append every non-blank word. Returns how many lines were written.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be opened or written.
    pub fn record<S: AsRef<str>>(&self, words: &[S]) -> Result<usize, EncounterLogError> {
        let cleaned: Vec<&str> = words
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .collect();
        if cleaned.is_empty() {
            return Ok(0);
        }

        let mut payload = cleaned.join("\n");
        payload.push('\n');

        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| EncounterLogError::Open {
                path: self.path.display().to_string(),
                source,
            })?;
        file.write_all(payload.as_bytes())
            .map_err(|source| EncounterLogError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(cleaned.len())
    }
}

/// One row of the collated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub frequency: u64,
}

/// Collated encounter counts, words sorted alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyReport {
    pub total_word_encounters: u64,
    pub unique_words: usize,
    pub words: Vec<WordFrequency>,
}

impl FrequencyReport {
    /// Count occurrences from a raw log reader. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EncounterLogError> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        let mut total = 0u64;
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
            total += 1;
        }

        Ok(Self {
            total_word_encounters: total,
            unique_words: counts.len(),
            words: counts
                .into_iter()
                .map(|(word, frequency)| WordFrequency { word, frequency })
                .collect(),
        })
    }

    /// Collate the log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no words.
    pub fn from_log(path: impl AsRef<Path>) -> Result<Self, EncounterLogError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| EncounterLogError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let report = Self::from_reader(file)?;
        if report.unique_words == 0 {
            return Err(EncounterLogError::Empty);
        }
        Ok(report)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_frequency(&self) -> f64 {
        if self.unique_words == 0 {
            return 0.0;
        }
        self.total_word_encounters as f64 / self.unique_words as f64
    }

    /// Most frequent words first; ties keep alphabetical order.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<&WordFrequency> {
        let mut rows: Vec<&WordFrequency> = self.words.iter().collect();
        rows.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.word.cmp(&b.word)));
        rows.truncate(n);
        rows
    }

    /// Write the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
