//! Read markers off the page and classify them with the engine rules.

use skribbl_engine::{
    GAME_PHASE_PRIORITY, GamePhase, OverlayRule, OverlayState, PhaseCheck, SCREEN_ORDER, Screen,
    ScreenVisibility, WebsitePhase, WordHint, classify_website,
};

use crate::browser::{Marker, PageProbe};

const fn screen_marker(screen: Screen) -> Marker {
    match screen {
        Screen::Login => Marker::Home,
        Screen::Loading => Marker::Loading,
        Screen::Game => Marker::Game,
        Screen::Lobby => Marker::Lobby,
    }
}

pub async fn observe_screens<P: PageProbe + ?Sized>(probe: &P) -> ScreenVisibility {
    let mut visibility = ScreenVisibility::default();
    for screen in SCREEN_ORDER {
        let visible = probe.marker_visible(screen_marker(screen)).await;
        visibility.set(screen, visible);
    }
    visibility
}

pub async fn website_phase<P: PageProbe + ?Sized>(probe: &P) -> WebsitePhase {
    classify_website(&observe_screens(probe).await)
}

async fn toolbar_visible<P: PageProbe + ?Sized>(probe: &P) -> Option<bool> {
    let toolbar = probe.find(Marker::Toolbar).await?;
    Some(probe.is_visible(&toolbar).await)
}

async fn overlay_state<P: PageProbe + ?Sized>(probe: &P, rule: OverlayRule) -> Option<OverlayState> {
    let overlay = probe.find(Marker::Overlay).await?;
    let style = probe.attribute(&overlay, "style").await.ok()?;
    let open = rule.is_open(style.as_deref().unwrap_or_default());
    let words_shown = open
        && probe
            .marker_has_class(Marker::WordChoices, "show")
            .await
            .unwrap_or(false);
    Some(OverlayState { open, words_shown })
}

/// Walk [`GAME_PHASE_PRIORITY`], reading only the markers each check needs,
/// and stop at the first match.
pub async fn game_phase<P: PageProbe + ?Sized>(probe: &P, rule: OverlayRule) -> GamePhase {
    for check in GAME_PHASE_PRIORITY {
        let outcome = match check {
            PhaseCheck::Toolbar => PhaseCheck::toolbar(toolbar_visible(probe).await),
            PhaseCheck::Overlay => PhaseCheck::overlay(overlay_state(probe, rule).await),
            PhaseCheck::OwnRowGuessed => PhaseCheck::own_row(
                probe
                    .marker_has_class(Marker::OwnPlayerRow, "guessed")
                    .await,
            ),
            PhaseCheck::Fallback => Some(GamePhase::Guessing),
        };
        if let Some(phase) = outcome {
            return phase;
        }
    }
    GamePhase::Guessing
}

/// Read the hint cells in order. A cell that detaches mid-read counts as
/// still hidden.
pub async fn extract_hint<P: PageProbe + ?Sized>(probe: &P) -> WordHint {
    let mut texts = Vec::new();
    for cell in probe.find_all(Marker::HintCells).await {
        texts.push(probe.text(&cell).await.unwrap_or_default());
    }
    WordHint::from_cell_texts(&texts)
}
