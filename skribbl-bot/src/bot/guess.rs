use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skribbl_engine::{DelayBucket, DelayRange, RoundGuessedWords, pick_candidate};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::browser::{Marker, PageProbe};
use crate::common::pause;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Submitted { word: String, delay: Duration },
    /// The chat box holds text the user is typing.
    PendingText,
    /// The chat input is missing or covered.
    NotInteractable,
    NoCandidates,
}

/// Why a chat submission did not go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitSkip {
    PendingText,
    NotInteractable,
}

/// Type `text` into the chat unless something is already typed there.
pub async fn submit_chat<P: PageProbe + ?Sized>(probe: &P, text: &str) -> Result<(), SubmitSkip> {
    let input = probe
        .find(Marker::ChatInput)
        .await
        .ok_or(SubmitSkip::NotInteractable)?;
    let pending = probe.input_value(&input).await.unwrap_or_default();
    if !pending.trim().is_empty() {
        return Err(SubmitSkip::PendingText);
    }
    probe.submit_text(&input, text).await.map_err(|e| {
        debug!("chat submission skipped: {e}");
        SubmitSkip::NotInteractable
    })
}

/// Picks a guess, submits it and waits a human-looking interval.
#[derive(Debug, Clone)]
pub struct GuessScheduler {
    rng: ChaCha8Rng,
    delays: [DelayRange; 3],
}

impl GuessScheduler {
    #[must_use]
    pub fn new(seed: Option<u64>, delays: [DelayRange; 3]) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng, delays }
    }

    pub async fn guess<P: PageProbe + ?Sized>(
        &mut self,
        probe: &P,
        candidates: &[&str],
        revealed_letters: usize,
        guessed: &mut RoundGuessedWords,
        cancel: &CancellationToken,
    ) -> GuessOutcome {
        let Some(word) = pick_candidate(candidates, &mut self.rng) else {
            return GuessOutcome::NoCandidates;
        };

        match submit_chat(probe, word).await {
            Ok(()) => {}
            Err(SubmitSkip::PendingText) => return GuessOutcome::PendingText,
            Err(SubmitSkip::NotInteractable) => return GuessOutcome::NotInteractable,
        }

        guessed.insert(word);
        let delay = DelayBucket::for_revealed(revealed_letters)
            .range_in(&self.delays)
            .sample(&mut self.rng);
        debug!("guessed {word}, next guess in {delay:.1?}");
        pause(delay, cancel).await;
        GuessOutcome::Submitted {
            word: word.to_string(),
            delay,
        }
    }
}
