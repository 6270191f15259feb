//! Guess choice and the randomized post-guess delay.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range of seconds to wait after a guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    #[must_use]
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    #[must_use]
    pub fn contains(&self, delay: Duration) -> bool {
        let secs = delay.as_secs_f64();
        secs >= self.min_secs && secs <= self.max_secs
    }

    /// Draw a delay uniformly from the range. A reversed range collapses to
    /// its lower bound.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min_secs.max(0.0);
        let hi = self.max_secs.max(lo);
        if (hi - lo).abs() < f64::EPSILON {
            return Duration::from_secs_f64(lo);
        }
        Duration::from_secs_f64(rng.gen_range(lo..=hi))
    }
}

/// The more letters revealed, the sooner the next guess follows.
pub const GUESS_DELAY_RANGES: [DelayRange; 3] = [
    DelayRange::new(4.0, 8.0),
    DelayRange::new(3.0, 6.0),
    DelayRange::new(1.0, 2.0),
];

/// Delay bucket chosen from the number of revealed letters, clamped to 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DelayBucket(usize);

impl DelayBucket {
    pub const MAX: usize = GUESS_DELAY_RANGES.len() - 1;

    #[must_use]
    pub fn for_revealed(revealed_letters: usize) -> Self {
        Self(revealed_letters.min(Self::MAX))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn range_in(self, ranges: &[DelayRange; 3]) -> DelayRange {
        ranges[self.0]
    }
}

/// Pick one candidate uniformly at random.
pub fn pick_candidate<'a, R: Rng + ?Sized>(candidates: &[&'a str], rng: &mut R) -> Option<&'a str> {
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn buckets_clamp_revealed_count() {
        assert_eq!(DelayBucket::for_revealed(0).index(), 0);
        assert_eq!(DelayBucket::for_revealed(1).index(), 1);
        assert_eq!(DelayBucket::for_revealed(2).index(), 2);
        assert_eq!(DelayBucket::for_revealed(9).index(), 2);
    }

    #[test]
    fn bucket_ranges_match_defaults() {
        assert_eq!(
            DelayBucket::for_revealed(0).range_in(&GUESS_DELAY_RANGES),
            DelayRange::new(4.0, 8.0)
        );
        assert_eq!(
            DelayBucket::for_revealed(1).range_in(&GUESS_DELAY_RANGES),
            DelayRange::new(3.0, 6.0)
        );
        assert_eq!(
            DelayBucket::for_revealed(5).range_in(&GUESS_DELAY_RANGES),
            DelayRange::new(1.0, 2.0)
        );
    }

    #[test]
    fn bucket_delay_never_grows_with_more_hints() {
        let mut previous = f64::INFINITY;
        for revealed in 0..6 {
            let range = DelayBucket::for_revealed(revealed).range_in(&GUESS_DELAY_RANGES);
            assert!(range.max_secs <= previous);
            previous = range.max_secs;
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for range in GUESS_DELAY_RANGES {
            for _ in 0..50 {
                let delay = range.sample(&mut rng);
                assert!(range.contains(delay), "{delay:?} outside {range:?}");
            }
        }
    }

    #[test]
    fn degenerate_range_returns_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let delay = DelayRange::new(0.5, 0.5).sample(&mut rng);
        assert_eq!(delay, Duration::from_millis(500));
        let delay = DelayRange::new(2.0, 1.0).sample(&mut rng);
        assert_eq!(delay, Duration::from_secs(2));
    }

    #[test]
    fn pick_candidate_is_uniform_member() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let candidates = ["apple", "ample"];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let pick = pick_candidate(&candidates, &mut rng).unwrap();
            assert!(candidates.contains(&pick));
            seen.insert(pick);
        }
        assert_eq!(seen.len(), 2);
        assert!(pick_candidate(&[], &mut rng).is_none());
    }
}
