use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::browser::{Marker, PageProbe};
use crate::common::{Attempt, Retry, RetryPolicy, pause};

/// Words seen and picked on one word-selection screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPick {
    /// Every distinct word offered, in page order.
    pub offered: Vec<String>,
    pub chosen: Vec<String>,
}

impl WordPick {
    fn note_offered(&mut self, word: &str) {
        if !word.is_empty() && !self.offered.iter().any(|w| w == word) {
            self.offered.push(word.to_string());
        }
    }
}

/// Visible word buttons with their trimmed labels. Hidden buttons keep
/// labels from earlier rounds and are skipped.
async fn visible_labels<P: PageProbe + ?Sized>(probe: &P) -> Vec<(P::Element, String)> {
    let mut labelled = Vec::new();
    for button in probe.find_all(Marker::WordButtons).await {
        if !probe.is_visible(&button).await {
            continue;
        }
        if let Ok(text) = probe.text(&button).await {
            labelled.push((button, text.trim().to_string()));
        }
    }
    labelled
}

/// Distinct words currently offered on screen.
pub async fn read_offered<P: PageProbe + ?Sized>(probe: &P) -> Vec<String> {
    let mut pick = WordPick::default();
    for (_, word) in visible_labels(probe).await {
        pick.note_offered(&word);
    }
    pick.offered
}

/// Click visible word choices until `picks` distinct words are chosen or the
/// retry budget runs out. Every attempt waits out the policy delay first and
/// clicks at most one word, since a click dismisses its set and the page may
/// swap in the next one.
pub async fn select_words<P: PageProbe + ?Sized>(
    probe: &P,
    picks: usize,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> WordPick {
    let mut pick = WordPick::default();
    let mut retry = Retry::new(policy);
    if !pause(policy.delay(), cancel).await {
        return pick;
    }

    while pick.chosen.len() < picks {
        match retry.next_attempt(cancel).await {
            Attempt::Go(_) => {}
            Attempt::Exhausted => {
                warn!(
                    "word selection gave up with {}/{picks} words chosen",
                    pick.chosen.len()
                );
                break;
            }
            Attempt::Cancelled => break,
        }

        // Log every label before clicking; a click can swap the sets out.
        let labelled = visible_labels(probe).await;
        for (_, word) in &labelled {
            pick.note_offered(word);
        }

        for (button, word) in labelled {
            if word.is_empty() || pick.chosen.contains(&word) {
                continue;
            }
            match probe.click(&button).await {
                Ok(()) => {
                    pick.chosen.push(word);
                    break;
                }
                Err(e) => debug!("word {word} not clickable yet: {e}"),
            }
        }
    }
    pick
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeElement, FakePage};
    use std::time::{Duration, Instant};

    const QUICK: RetryPolicy = RetryPolicy::new(3, 1);

    #[tokio::test]
    async fn picks_one_word_from_each_set() {
        let page = FakePage::guessing(&[]);
        page.set_word_select(&[("cat", 1), ("hat", 2), ("bat", 1), ("mat", 2)]);

        let pick = select_words(&page, 2, QUICK, &CancellationToken::new()).await;
        assert_eq!(pick.chosen, vec!["cat", "hat"]);
        assert_eq!(pick.offered, vec!["cat", "hat", "bat", "mat"]);
    }

    #[tokio::test]
    async fn same_text_is_never_chosen_twice() {
        let page = FakePage::guessing(&[]);
        page.set_word_select(&[("cat", 1), ("cat", 2), ("dog", 2)]);

        let pick = select_words(&page, 2, QUICK, &CancellationToken::new()).await;
        assert_eq!(pick.chosen, vec!["cat", "dog"]);
        assert_eq!(pick.offered, vec!["cat", "dog"]);
    }

    #[tokio::test]
    async fn blocked_choices_exhaust_the_retries() {
        let page = FakePage::guessing(&[]);
        page.set(
            Marker::WordButtons,
            vec![FakeElement::shown().with_text("cat").blocked()],
        );

        let pick = select_words(&page, 1, QUICK, &CancellationToken::new()).await;
        assert!(pick.chosen.is_empty());
        assert_eq!(pick.offered, vec!["cat"]);
        let lookups = page
            .lookups()
            .into_iter()
            .filter(|m| *m == Marker::WordButtons)
            .count();
        assert_eq!(lookups, 3);
    }

    #[tokio::test]
    async fn hidden_leftover_labels_are_not_offered() {
        let page = FakePage::guessing(&[]);
        page.set(
            Marker::WordButtons,
            vec![
                FakeElement::hidden().with_text("ghost").in_group(1),
                FakeElement::shown().with_text("cat").in_group(2),
            ],
        );

        let pick = select_words(&page, 1, QUICK, &CancellationToken::new()).await;
        assert_eq!(pick.chosen, vec!["cat"]);
        assert_eq!(pick.offered, vec!["cat"]);
        assert_eq!(read_offered(&page).await, Vec::<String>::new());
    }

    #[tokio::test]
    async fn each_pick_waits_for_the_retry_delay() {
        let page = FakePage::guessing(&[]);
        page.set_word_select(&[("cat", 1), ("hat", 2)]);
        let started = Instant::now();

        let spaced = RetryPolicy::new(3, 20);
        let pick = select_words(&page, 2, spaced, &CancellationToken::new()).await;
        assert_eq!(pick.chosen, vec!["cat", "hat"]);
        assert!(started.elapsed() >= Duration::from_millis(40));
        let lookups = page
            .lookups()
            .into_iter()
            .filter(|m| *m == Marker::WordButtons)
            .count();
        assert_eq!(lookups, 2);
    }

    #[tokio::test]
    async fn cancelled_before_the_first_pick() {
        let page = FakePage::guessing(&[]);
        page.set_word_select(&[("cat", 1)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let pick = select_words(&page, 1, QUICK, &cancel).await;
        assert_eq!(pick, WordPick::default());
        assert!(page.clicks().is_empty());
    }

    #[tokio::test]
    async fn read_offered_lists_distinct_words() {
        let page = FakePage::guessing(&[]);
        page.set_word_select(&[("kite", 1), (" kite ", 1), ("lamp", 1)]);
        assert_eq!(read_offered(&page).await, vec!["kite", "lamp"]);
        assert!(page.clicks().is_empty());
    }
}
