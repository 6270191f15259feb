use async_trait::async_trait;
use thiserror::Error;

/// Named page elements the bot looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Login / home screen.
    Home,
    /// Loading screen.
    Loading,
    /// Game screen.
    Game,
    /// Private room settings overlay shown on top of the game screen.
    Lobby,
    /// Drawing toolbar, only visible to the drawer.
    Toolbar,
    /// Word-selection overlay on the canvas.
    Overlay,
    /// Word-choice panel nested in the overlay.
    WordChoices,
    /// Individual word-choice buttons.
    WordButtons,
    /// Row of the player list belonging to this session.
    OwnPlayerRow,
    /// Letter cells of the masked answer.
    HintCells,
    /// Chat input used for guesses.
    ChatInput,
    /// Entries of the player list.
    PlayerEntries,
    /// Lobby button that starts the game.
    StartButton,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("element not found")]
    Absent,
    #[error("element not interactable: {0}")]
    NotInteractable(String),
}

pub type ProbeResult<T> = Result<T, ProbeError>;

/// Read and act on the rendered page.
///
/// Lookups never fail hard: a missing or detached element is `None`, an
/// empty list or `false`. Actions report [`ProbeError`] so the caller can
/// skip the attempt and retry on a later tick.
#[async_trait]
pub trait PageProbe: Send + Sync {
    type Element: Clone + Send + Sync;

    async fn find(&self, marker: Marker) -> Option<Self::Element>;

    async fn find_all(&self, marker: Marker) -> Vec<Self::Element>;

    async fn is_visible(&self, element: &Self::Element) -> bool;

    /// Raw text content, untrimmed.
    async fn text(&self, element: &Self::Element) -> ProbeResult<String>;

    async fn attribute(&self, element: &Self::Element, name: &str) -> ProbeResult<Option<String>>;

    /// Current value of an input field.
    async fn input_value(&self, element: &Self::Element) -> ProbeResult<String>;

    /// Type `text` into an input and press Enter.
    async fn submit_text(&self, element: &Self::Element, text: &str) -> ProbeResult<()>;

    async fn click(&self, element: &Self::Element) -> ProbeResult<()>;

    /// Find `marker` and report whether it is visible.
    async fn marker_visible(&self, marker: Marker) -> bool {
        match self.find(marker).await {
            Some(element) => self.is_visible(&element).await,
            None => false,
        }
    }

    /// Whether `marker` carries `class` in its class list.
    async fn marker_has_class(&self, marker: Marker, class: &str) -> Option<bool> {
        let element = self.find(marker).await?;
        let classes = self.attribute(&element, "class").await.ok()?;
        Some(has_class(classes.as_deref().unwrap_or_default(), class))
    }
}

/// Whitespace-separated class list membership.
#[must_use]
pub fn has_class(classes: &str, class: &str) -> bool {
    classes.split_whitespace().any(|c| c == class)
}
