use async_trait::async_trait;
use thirtyfour::prelude::*;

use super::probe::{Marker, PageProbe, ProbeError, ProbeResult};

/// Selector for a marker, kept separate from [`By`] so the table can be
/// inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Id(&'static str),
    Css(&'static str),
    XPath(&'static str),
}

/// Where each marker lives on skribbl.io.
#[must_use]
pub const fn selector(marker: Marker) -> Selector {
    match marker {
        Marker::Home => Selector::Id("home"),
        Marker::Loading => Selector::Id("load"),
        Marker::Game => Selector::Id("game"),
        Marker::Lobby => Selector::Css(".room.show"),
        Marker::Toolbar => Selector::Id("game-toolbar"),
        Marker::Overlay => Selector::Css("#game-canvas .overlay-content"),
        Marker::WordChoices => Selector::Css("#game-canvas .overlay-content .words"),
        Marker::WordButtons => Selector::Css("#game-canvas .overlay-content .words .word"),
        Marker::OwnPlayerRow => Selector::XPath(
            "//div[@id='game-players']//div[contains(@class,'players-list')]\
             //*[contains(concat(' ', normalize-space(@class), ' '), ' me ')]/../..",
        ),
        Marker::HintCells => Selector::Css("#game-word .hints .hint"),
        Marker::ChatInput => Selector::Css("#game-wrapper #game-chat .chat-container form input"),
        Marker::PlayerEntries => Selector::Css("#game-players .players-list .player"),
        Marker::StartButton => Selector::Id("start-game"),
    }
}

impl Selector {
    #[must_use]
    pub fn by(self) -> By {
        match self {
            Self::Id(id) => By::Id(id),
            Self::Css(css) => By::Css(css),
            Self::XPath(xpath) => By::XPath(xpath),
        }
    }
}

#[must_use]
pub fn locator(marker: Marker) -> By {
    selector(marker).by()
}

/// [`PageProbe`] over a live webdriver session.
#[derive(Debug, Clone)]
pub struct WebDriverProbe {
    driver: WebDriver,
}

impl WebDriverProbe {
    #[must_use]
    pub const fn new(driver: WebDriver) -> Self {
        Self { driver }
    }
}

fn not_interactable(err: impl std::fmt::Display) -> ProbeError {
    ProbeError::NotInteractable(err.to_string())
}

#[async_trait]
impl PageProbe for WebDriverProbe {
    type Element = WebElement;

    async fn find(&self, marker: Marker) -> Option<WebElement> {
        self.driver.find(locator(marker)).await.ok()
    }

    async fn find_all(&self, marker: Marker) -> Vec<WebElement> {
        self.driver
            .find_all(locator(marker))
            .await
            .unwrap_or_default()
    }

    async fn is_visible(&self, element: &WebElement) -> bool {
        // A stale element reads as hidden.
        element.is_displayed().await.unwrap_or(false)
    }

    async fn text(&self, element: &WebElement) -> ProbeResult<String> {
        match element.prop("textContent").await {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Ok(String::new()),
            Err(_) => Err(ProbeError::Absent),
        }
    }

    async fn attribute(&self, element: &WebElement, name: &str) -> ProbeResult<Option<String>> {
        element.attr(name).await.map_err(|_| ProbeError::Absent)
    }

    async fn input_value(&self, element: &WebElement) -> ProbeResult<String> {
        element
            .value()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|_| ProbeError::Absent)
    }

    async fn submit_text(&self, element: &WebElement, text: &str) -> ProbeResult<()> {
        element
            .send_keys(text)
            .await
            .map_err(not_interactable)?;
        element
            .send_keys("\n")
            .await
            .map_err(not_interactable)
    }

    async fn click(&self, element: &WebElement) -> ProbeResult<()> {
        element.click().await.map_err(not_interactable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_markers_use_ids() {
        assert_eq!(selector(Marker::Home), Selector::Id("home"));
        assert_eq!(selector(Marker::Loading), Selector::Id("load"));
        assert_eq!(selector(Marker::Game), Selector::Id("game"));
        assert_eq!(selector(Marker::Lobby), Selector::Css(".room.show"));
    }

    #[test]
    fn own_row_climbs_to_player_entry() {
        let Selector::XPath(path) = selector(Marker::OwnPlayerRow) else {
            panic!("own row should use xpath");
        };
        assert!(path.ends_with("/../.."));
        assert!(path.contains(" me "));
        assert!(!path.contains("  "));
    }
}
