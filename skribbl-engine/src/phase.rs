//! Page phase model and the classification rules that map marker
//! observations onto it.
//!
//! The rules here are pure: callers gather observations from the page (in
//! whatever order and with whatever laziness they like) and hand them over.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of which top-level screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsitePhase {
    Login,
    Lobby,
    Loading,
    Game,
    /// No screen marker is visible.
    Unknown,
    /// More than one screen marker is visible after precedence is applied.
    Multiple,
}

impl WebsitePhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Lobby => "lobby",
            Self::Loading => "loading",
            Self::Game => "game",
            Self::Unknown => "unknown",
            Self::Multiple => "multiple",
        }
    }

    /// Unknown and multiple resolve themselves as the page settles.
    #[must_use]
    pub const fn is_ambiguous(self) -> bool {
        matches!(self, Self::Unknown | Self::Multiple)
    }
}

impl fmt::Display for WebsitePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fine-grained in-game activity. Only meaningful while the website phase is
/// [`WebsitePhase::Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Drawing,
    WordSelect,
    WaitingForRound,
    Guessed,
    Guessing,
}

impl GamePhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Drawing => "drawing",
            Self::WordSelect => "word_select",
            Self::WaitingForRound => "waiting_for_round",
            Self::Guessed => "guessed",
            Self::Guessing => "guessing",
        }
    }

    /// Phases whose handler runs on every tick rather than only on entry.
    #[must_use]
    pub const fn repeats_every_tick(self) -> bool {
        matches!(self, Self::Guessing)
    }

    /// Entering one of these phases ends the current guessing round.
    #[must_use]
    pub const fn ends_round(self) -> bool {
        matches!(self, Self::Drawing | Self::WaitingForRound | Self::Guessed)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Screens that carry a dedicated visibility marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Loading,
    Game,
    /// The lobby is an overlay drawn on top of the game screen.
    Lobby,
}

impl Screen {
    #[must_use]
    pub const fn phase(self) -> WebsitePhase {
        match self {
            Self::Login => WebsitePhase::Login,
            Self::Loading => WebsitePhase::Loading,
            Self::Game => WebsitePhase::Game,
            Self::Lobby => WebsitePhase::Lobby,
        }
    }
}

/// Evaluation order for the screen markers. Lobby comes after game so its
/// precedence rule can see the game match.
pub const SCREEN_ORDER: [Screen; 4] = [Screen::Login, Screen::Loading, Screen::Game, Screen::Lobby];

/// Which screen markers were visible on one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenVisibility {
    pub login: bool,
    pub loading: bool,
    pub game: bool,
    pub lobby: bool,
}

impl ScreenVisibility {
    #[must_use]
    pub const fn is_visible(&self, screen: Screen) -> bool {
        match screen {
            Screen::Login => self.login,
            Screen::Loading => self.loading,
            Screen::Game => self.game,
            Screen::Lobby => self.lobby,
        }
    }

    pub fn set(&mut self, screen: Screen, visible: bool) {
        match screen {
            Screen::Login => self.login = visible,
            Screen::Loading => self.loading = visible,
            Screen::Game => self.game = visible,
            Screen::Lobby => self.lobby = visible,
        }
    }
}

/// Map screen marker visibility onto a single website phase.
#[must_use]
pub fn classify_website(visibility: &ScreenVisibility) -> WebsitePhase {
    let mut displayed: Vec<Screen> = Vec::with_capacity(SCREEN_ORDER.len());
    for screen in SCREEN_ORDER {
        if !visibility.is_visible(screen) {
            continue;
        }
        if screen == Screen::Lobby {
            displayed.retain(|s| *s != Screen::Game);
        }
        displayed.push(screen);
    }

    match displayed.as_slice() {
        [] => WebsitePhase::Unknown,
        [single] => single.phase(),
        _ => WebsitePhase::Multiple,
    }
}

/// How the word-selection overlay's inline style is read as open/closed.
///
/// Two readings of the overlay exist and they disagree while the overlay is
/// animating, so the boundary is configurable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayRule {
    /// Open only once the overlay has settled at `top: 0`.
    #[default]
    SettledAtTop,
    /// Open as soon as it is no longer parked at `top: -100%`.
    NotParked,
}

impl OverlayRule {
    #[must_use]
    pub fn is_open(self, style: &str) -> bool {
        match self {
            Self::SettledAtTop => style.contains("top: 0"),
            Self::NotParked => !style.contains("top: -100%"),
        }
    }
}

/// Individual checks of the game phase classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCheck {
    Toolbar,
    Overlay,
    OwnRowGuessed,
    Fallback,
}

/// Priority order of the game phase checks; the first check that yields a
/// phase wins and later checks are never evaluated.
pub const GAME_PHASE_PRIORITY: [PhaseCheck; 4] = [
    PhaseCheck::Toolbar,
    PhaseCheck::Overlay,
    PhaseCheck::OwnRowGuessed,
    PhaseCheck::Fallback,
];

/// State of the word-selection overlay as read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayState {
    pub open: bool,
    pub words_shown: bool,
}

/// Everything the game phase checks may look at. `None` means the marker
/// was not found, which fails the check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSignals {
    pub toolbar_visible: Option<bool>,
    pub overlay: Option<OverlayState>,
    pub own_row_guessed: Option<bool>,
}

impl PhaseCheck {
    /// Outcome of the toolbar check.
    #[must_use]
    pub fn toolbar(visible: Option<bool>) -> Option<GamePhase> {
        visible
            .filter(|visible| *visible)
            .map(|_| GamePhase::Drawing)
    }

    /// Outcome of the overlay check.
    #[must_use]
    pub fn overlay(state: Option<OverlayState>) -> Option<GamePhase> {
        let state = state.filter(|s| s.open)?;
        if state.words_shown {
            Some(GamePhase::WordSelect)
        } else {
            Some(GamePhase::WaitingForRound)
        }
    }

    /// Outcome of the own-row check.
    #[must_use]
    pub fn own_row(guessed: Option<bool>) -> Option<GamePhase> {
        guessed.filter(|g| *g).map(|_| GamePhase::Guessed)
    }

    #[must_use]
    pub fn evaluate(self, signals: &GameSignals) -> Option<GamePhase> {
        match self {
            Self::Toolbar => Self::toolbar(signals.toolbar_visible),
            Self::Overlay => Self::overlay(signals.overlay),
            Self::OwnRowGuessed => Self::own_row(signals.own_row_guessed),
            Self::Fallback => Some(GamePhase::Guessing),
        }
    }
}

/// Classify pre-gathered signals using [`GAME_PHASE_PRIORITY`].
#[must_use]
pub fn classify_game(signals: &GameSignals) -> GamePhase {
    GAME_PHASE_PRIORITY
        .iter()
        .find_map(|check| check.evaluate(signals))
        .unwrap_or(GamePhase::Guessing)
}

/// Remembers the previous tick's value so handlers only fire on change.
#[derive(Debug, Clone)]
pub struct PhaseTracker<T> {
    last: Option<T>,
}

impl<T> Default for PhaseTracker<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: Copy + PartialEq> PhaseTracker<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `value` and return the previous value when it changed.
    pub fn observe(&mut self, value: T) -> Transition<T> {
        let previous = self.last.replace(value);
        if previous == Some(value) {
            Transition::Unchanged
        } else {
            Transition::Changed { from: previous }
        }
    }

    #[must_use]
    pub const fn last(&self) -> Option<T> {
        self.last
    }

    /// Forget the previous value so the next observation counts as a change.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<T> {
    Unchanged,
    Changed { from: Option<T> },
}

impl<T> Transition<T> {
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}
