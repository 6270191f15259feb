//! Masked answer hints and the patterns compiled from them.
//!
//! A hint is rendered as a string of `_` (hidden letter), literal characters
//! (revealed letters and punctuation) and spaces (gaps between words).

use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintCell {
    /// A letter the game has uncovered, or punctuation that is always shown.
    Revealed(char),
    /// A letter that is still masked.
    Hidden,
    /// A gap between the words of a multi-word answer.
    Gap,
}

impl HintCell {
    /// Read a cell from the raw text content of its element.
    ///
    /// Empty text is a masked letter; whitespace-only text is the gap between
    /// two words; anything else is the revealed character.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Hidden;
        }
        match raw.trim().chars().next() {
            None => Self::Gap,
            Some('_') => Self::Hidden,
            Some(c) => Self::Revealed(c),
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Revealed(c) => c,
            Self::Hidden => '_',
            Self::Gap => ' ',
        }
    }

    fn pattern_fragment(self, out: &mut String) {
        match self {
            Self::Hidden => out.push_str(r"\w"),
            Self::Gap => out.push_str(r"\W"),
            Self::Revealed(c) => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum HintError {
    #[error("hint is empty")]
    Empty,
    #[error("hint pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// An immutable capture of the answer's masked form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordHint {
    cells: SmallVec<[HintCell; 24]>,
}

impl WordHint {
    /// Build a hint from cells, trimming gap cells at either end.
    #[must_use]
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = HintCell>,
    {
        let mut cells: SmallVec<[HintCell; 24]> = cells.into_iter().collect();
        while cells.last() == Some(&HintCell::Gap) {
            cells.pop();
        }
        let leading = cells.iter().take_while(|c| **c == HintCell::Gap).count();
        if leading > 0 {
            cells.drain(..leading);
        }
        Self { cells }
    }

    /// Build a hint from cell texts as read from the page.
    #[must_use]
    pub fn from_cell_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::from_cells(texts.iter().map(|t| HintCell::from_text(t.as_ref())))
    }

    /// Parse the rendered form (`_e__o`, `ice cream`, `t-shirt`).
    #[must_use]
    pub fn parse(rendered: &str) -> Self {
        Self::from_cells(rendered.chars().map(|c| match c {
            '_' => HintCell::Hidden,
            c if c.is_whitespace() => HintCell::Gap,
            c => HintCell::Revealed(c),
        }))
    }

    #[must_use]
    pub fn cells(&self) -> &[HintCell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of letters the game has given away so far. Punctuation and
    /// gaps are not hints.
    #[must_use]
    pub fn revealed_letters(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, HintCell::Revealed(ch) if ch.is_alphabetic()))
            .count()
    }

    /// Anchored pattern source for this hint.
    #[must_use]
    pub fn pattern_source(&self) -> String {
        let mut source = String::with_capacity(self.cells.len() * 2 + 2);
        source.push('^');
        for cell in &self.cells {
            cell.pattern_fragment(&mut source);
        }
        source.push('$');
        source
    }

    /// Compile the hint into a case-insensitive whole-string matcher.
    ///
    /// # Errors
    ///
    /// Returns [`HintError::Empty`] for an empty hint, or
    /// [`HintError::Pattern`] if the pattern cannot be compiled.
    pub fn pattern(&self) -> Result<Regex, HintError> {
        if self.is_empty() {
            return Err(HintError::Empty);
        }
        let regex = RegexBuilder::new(&self.pattern_source())
            .case_insensitive(true)
            .build()?;
        Ok(regex)
    }
}

impl fmt::Display for WordHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.symbol())?;
        }
        Ok(())
    }
}
