//! Fixed-interval polling loop: classify the page, dispatch on change.

use log::{debug, info, warn};
use skribbl_engine::{
    EncounterLog, GamePhase, PhaseTracker, RoundGuessedWords, Transition, Vocabulary, WebsitePhase,
    combined_answer,
};
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::classify::{extract_hint, game_phase, website_phase};
use super::guess::{GuessOutcome, GuessScheduler, SubmitSkip, submit_chat};
use super::lobby::{MIN_PLAYERS, StartOutcome, start_game};
use super::partner::PartnerLink;
use super::word_select::{read_offered, select_words};
use crate::browser::PageProbe;
use crate::common::pause;
use crate::config::BotConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Plays alongside a human; guesses from hints, never picks words.
    Solo,
    Host,
    Player,
}

impl Role {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Host => "host",
            Self::Player => "player",
        }
    }
}

/// Where guesses come from.
#[derive(Debug, Clone)]
pub enum GuessStrategy {
    /// Filter the vocabulary by the hint.
    Hints(Arc<Vocabulary>),
    /// Wait for the drawing partner to forward the answer.
    Partner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub games_started: u64,
    pub guesses: u64,
    pub words_chosen: u64,
    pub words_logged: u64,
    pub forwards_sent: u64,
    pub forwards_submitted: u64,
}

/// What one tick saw and whether a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub website: WebsitePhase,
    pub game: Option<GamePhase>,
    pub dispatched: bool,
}

enum Wake {
    Stop,
    Tick,
    Forwarded(Option<String>),
}

async fn next_forwarded(link: Option<&mut PartnerLink>) -> Option<String> {
    match link {
        Some(link) => link.inbox.recv().await,
        None => pending().await,
    }
}

pub struct GameLoop<P> {
    role: Role,
    probe: P,
    cfg: BotConfig,
    strategy: GuessStrategy,
    scheduler: GuessScheduler,
    website: PhaseTracker<WebsitePhase>,
    game: PhaseTracker<GamePhase>,
    round_words: RoundGuessedWords,
    partner: Option<PartnerLink>,
    encounters: Option<Arc<EncounterLog>>,
    answer: Option<String>,
    stats: LoopStats,
}

impl<P: PageProbe> GameLoop<P> {
    pub fn new(role: Role, probe: P, cfg: BotConfig, strategy: GuessStrategy) -> Self {
        let scheduler = GuessScheduler::new(cfg.seed, cfg.guess_delays);
        Self {
            role,
            probe,
            cfg,
            strategy,
            scheduler,
            website: PhaseTracker::new(),
            game: PhaseTracker::new(),
            round_words: RoundGuessedWords::new(),
            partner: None,
            encounters: None,
            answer: None,
            stats: LoopStats::default(),
        }
    }

    #[must_use]
    pub fn with_partner(mut self, link: PartnerLink) -> Self {
        self.partner = Some(link);
        self
    }

    #[must_use]
    pub fn with_encounters(mut self, log: Arc<EncounterLog>) -> Self {
        self.encounters = Some(log);
        self
    }

    pub const fn stats(&self) -> LoopStats {
        self.stats
    }

    #[cfg(test)]
    pub const fn probe(&self) -> &P {
        &self.probe
    }

    #[cfg(test)]
    pub const fn round_words(&self) -> &RoundGuessedWords {
        &self.round_words
    }

    /// The answer picked on the last word-selection screen, until forwarded.
    #[cfg(test)]
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Poll until `cancel` fires. Forwarded answers are handled between
    /// ticks, never in the middle of one.
    pub async fn run(&mut self, cancel: &CancellationToken) {
        let mut interval = tokio::time::interval(self.cfg.tick().max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("{}: loop started", self.role.label());

        loop {
            let wake = tokio::select! {
                biased;
                () = cancel.cancelled() => Wake::Stop,
                word = next_forwarded(self.partner.as_mut()) => Wake::Forwarded(word),
                _ = interval.tick() => Wake::Tick,
            };
            match wake {
                Wake::Stop => break,
                Wake::Tick => {
                    self.tick(cancel).await;
                }
                Wake::Forwarded(Some(word)) => self.receive_forward(&word).await,
                Wake::Forwarded(None) => {
                    debug!("{}: partner hung up", self.role.label());
                    self.partner = None;
                }
            }
        }
        info!("{}: loop stopped after {} ticks", self.role.label(), self.stats.ticks);
    }

    pub async fn tick(&mut self, cancel: &CancellationToken) -> TickReport {
        self.stats.ticks += 1;
        let role = self.role.label();

        let website = website_phase(&self.probe).await;
        if let Transition::Changed { from } = self.website.observe(website) {
            let from = from.map_or("start", WebsitePhase::label);
            if website.is_ambiguous() {
                warn!("{role}: website phase {from} -> {website}");
            } else {
                info!("{role}: {from} -> {website}");
            }
            if website != WebsitePhase::Game {
                self.game.reset();
            }
        }
        if website != WebsitePhase::Game {
            // A finished game drops the room back to the lobby; the host
            // keeps pressing start so self-play runs game after game.
            let dispatched = website == WebsitePhase::Lobby && self.role == Role::Host;
            if dispatched {
                self.on_lobby(cancel).await;
            }
            return TickReport {
                website,
                game: None,
                dispatched,
            };
        }

        let phase = game_phase(&self.probe, self.cfg.overlay_rule).await;
        let changed = self.game.observe(phase).is_change();
        if changed {
            info!("{role}: game phase {phase}");
            if phase.ends_round() {
                self.round_words.clear();
            }
        }

        let dispatched = changed || phase.repeats_every_tick();
        if dispatched {
            self.dispatch(phase, cancel).await;
        }
        TickReport {
            website,
            game: Some(phase),
            dispatched,
        }
    }

    async fn dispatch(&mut self, phase: GamePhase, cancel: &CancellationToken) {
        match phase {
            GamePhase::Drawing => self.on_drawing(cancel).await,
            GamePhase::WordSelect => self.on_word_select(cancel).await,
            GamePhase::Guessing => self.on_guessing(cancel).await,
            GamePhase::WaitingForRound | GamePhase::Guessed => {}
        }
    }

    async fn on_lobby(&mut self, cancel: &CancellationToken) {
        let policy = self.cfg.lobby_restart_retry;
        match start_game(&self.probe, MIN_PLAYERS, policy, cancel).await {
            StartOutcome::Started { .. } => self.stats.games_started += 1,
            StartOutcome::TimedOut => debug!("{}: lobby not ready yet", self.role.label()),
            StartOutcome::Cancelled => {}
        }
    }

    async fn on_drawing(&mut self, cancel: &CancellationToken) {
        let Some(answer) = self.answer.take() else {
            return;
        };
        // Let the word overlay slide away before the partner starts typing.
        if !pause(self.cfg.overlay_wait(), cancel).await {
            return;
        }
        if let Some(partner) = &self.partner {
            info!("{}: forwarding {answer}", self.role.label());
            partner.forward(&answer);
            self.stats.forwards_sent += 1;
        }
    }

    async fn on_word_select(&mut self, cancel: &CancellationToken) {
        let role = self.role.label();
        if self.role == Role::Solo {
            let offered = read_offered(&self.probe).await;
            info!("{role}: words offered: {}", offered.join(", "));
            return;
        }

        let picks = self.cfg.room.word_mode.words_to_pick();
        let pick = select_words(&self.probe, picks, self.cfg.word_select_retry, cancel).await;
        if let Some(log) = &self.encounters {
            match log.record(&pick.offered) {
                Ok(written) => self.stats.words_logged += written as u64,
                Err(e) => warn!("{role}: encounter log write failed: {e}"),
            }
        }
        if pick.chosen.is_empty() {
            return;
        }
        self.stats.words_chosen += pick.chosen.len() as u64;
        let answer = combined_answer(&pick.chosen, &self.cfg.word_delimiter);
        info!("{role}: chose {answer} from {}", pick.offered.join(", "));
        self.answer = Some(answer);
    }

    async fn on_guessing(&mut self, cancel: &CancellationToken) {
        let GuessStrategy::Hints(vocabulary) = &self.strategy else {
            return;
        };
        let role = self.role.label();
        let hint = extract_hint(&self.probe).await;
        if hint.is_empty() {
            debug!("{role}: no hint on screen");
            return;
        }
        let candidates = match vocabulary.candidates(&hint, &self.round_words) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("{role}: unusable hint {hint}: {e}");
                return;
            }
        };
        if candidates.is_empty() {
            info!("{role}: no candidates left for {hint}");
            return;
        }

        let outcome = self
            .scheduler
            .guess(
                &self.probe,
                &candidates,
                hint.revealed_letters(),
                &mut self.round_words,
                cancel,
            )
            .await;
        match outcome {
            GuessOutcome::Submitted { word, .. } => {
                self.stats.guesses += 1;
                info!("{role}: guessed {word} for {hint} ({} candidates)", candidates.len());
            }
            GuessOutcome::PendingText => debug!("{role}: chat busy, guess deferred"),
            GuessOutcome::NotInteractable => debug!("{role}: chat not interactable"),
            GuessOutcome::NoCandidates => {}
        }
    }

    /// Submit an answer forwarded by the drawing partner, if this bot is in
    /// a position to guess.
    pub async fn receive_forward(&mut self, word: &str) {
        let role = self.role.label();
        if website_phase(&self.probe).await != WebsitePhase::Game {
            debug!("{role}: dropped forwarded {word}, not in a game");
            return;
        }
        if game_phase(&self.probe, self.cfg.overlay_rule).await == GamePhase::Guessed {
            debug!("{role}: dropped forwarded {word}, already guessed");
            return;
        }
        match submit_chat(&self.probe, word).await {
            Ok(()) => {
                self.round_words.insert(word);
                self.stats.forwards_submitted += 1;
                info!("{role}: submitted forwarded {word}");
            }
            Err(SubmitSkip::PendingText) => debug!("{role}: chat busy, forwarded {word} dropped"),
            Err(SubmitSkip::NotInteractable) => {
                debug!("{role}: chat not interactable, forwarded {word} dropped");
            }
        }
    }
}
