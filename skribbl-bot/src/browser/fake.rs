//! In-memory page used by the unit tests in place of a browser.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::probe::{Marker, PageProbe, ProbeError, ProbeResult};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub visible: bool,
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub value: String,
    pub blocked: bool,
    pub group: u8,
}

impl FakeElement {
    pub fn shown() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn in_group(mut self, group: u8) -> Self {
        self.group = group;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeRef {
    pub marker: Marker,
    pub index: usize,
}

#[derive(Debug, Default)]
struct FakeState {
    elements: HashMap<Marker, Vec<FakeElement>>,
    submissions: Vec<String>,
    clicks: Vec<(Marker, String)>,
    lookups: Vec<Marker>,
}

#[derive(Debug, Default)]
pub struct FakePage {
    state: Mutex<FakeState>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }

    pub fn set(&self, marker: Marker, elements: Vec<FakeElement>) {
        self.with_state(|s| {
            s.elements.insert(marker, elements);
        });
    }

    pub fn set_one(&self, marker: Marker, element: FakeElement) {
        self.set(marker, vec![element]);
    }

    pub fn remove(&self, marker: Marker) {
        self.with_state(|s| {
            s.elements.remove(&marker);
        });
    }

    pub fn submissions(&self) -> Vec<String> {
        self.with_state(|s| s.submissions.clone())
    }

    pub fn clicks(&self) -> Vec<(Marker, String)> {
        self.with_state(|s| s.clicks.clone())
    }

    pub fn lookups(&self) -> Vec<Marker> {
        self.with_state(|s| s.lookups.clone())
    }

    pub fn clear_lookups(&self) {
        self.with_state(|s| s.lookups.clear());
    }

    /// Login screen only.
    pub fn login() -> Self {
        let page = Self::new();
        page.set_one(Marker::Home, FakeElement::shown());
        page.set_one(Marker::Loading, FakeElement::hidden());
        page.set_one(Marker::Game, FakeElement::hidden());
        page
    }

    /// In a round, guessing, with the given hint cell texts.
    pub fn guessing(hint_cells: &[&str]) -> Self {
        let page = Self::new();
        page.set_one(Marker::Home, FakeElement::hidden());
        page.set_one(Marker::Loading, FakeElement::hidden());
        page.set_one(Marker::Game, FakeElement::shown());
        page.set_one(Marker::Toolbar, FakeElement::hidden());
        page.set_overlay_closed();
        page.set_one(
            Marker::OwnPlayerRow,
            FakeElement::shown().with_attr("class", "player"),
        );
        page.set_one(Marker::ChatInput, FakeElement::shown());
        page.set_hint(hint_cells);
        page
    }

    pub fn set_hint(&self, hint_cells: &[&str]) {
        self.set(
            Marker::HintCells,
            hint_cells
                .iter()
                .map(|t| FakeElement::shown().with_text(t))
                .collect(),
        );
    }

    pub fn set_overlay_closed(&self) {
        self.set_one(
            Marker::Overlay,
            FakeElement::shown().with_attr("style", "top: -100%;"),
        );
        self.set_one(
            Marker::WordChoices,
            FakeElement::shown().with_attr("class", "words"),
        );
        self.remove(Marker::WordButtons);
    }

    pub fn set_drawing(&self) {
        self.set_overlay_closed();
        self.set_one(Marker::Toolbar, FakeElement::shown());
    }

    pub fn set_waiting(&self) {
        self.set_one(Marker::Toolbar, FakeElement::hidden());
        self.set_one(
            Marker::Overlay,
            FakeElement::shown().with_attr("style", "top: 0%;"),
        );
        self.set_one(
            Marker::WordChoices,
            FakeElement::shown().with_attr("class", "words"),
        );
    }

    /// Word-selection screen offering `words`, each tagged with the set it
    /// belongs to. Clicking a word dismisses its whole set.
    pub fn set_word_select(&self, words: &[(&str, u8)]) {
        self.set_one(Marker::Toolbar, FakeElement::hidden());
        self.set_one(
            Marker::Overlay,
            FakeElement::shown().with_attr("style", "top: 0%;"),
        );
        self.set_one(
            Marker::WordChoices,
            FakeElement::shown().with_attr("class", "words show"),
        );
        self.set(
            Marker::WordButtons,
            words
                .iter()
                .map(|(w, g)| FakeElement::shown().with_text(w).in_group(*g))
                .collect(),
        );
    }

    pub fn set_guessed(&self) {
        self.set_overlay_closed();
        self.set_one(Marker::Toolbar, FakeElement::hidden());
        self.set_one(
            Marker::OwnPlayerRow,
            FakeElement::shown().with_attr("class", "player guessed"),
        );
    }

    pub fn set_guessing(&self) {
        self.set_overlay_closed();
        self.set_one(Marker::Toolbar, FakeElement::hidden());
        self.set_one(
            Marker::OwnPlayerRow,
            FakeElement::shown().with_attr("class", "player"),
        );
    }

    pub fn set_lobby(&self, players: usize) {
        self.set_one(Marker::Game, FakeElement::shown());
        self.set_one(Marker::Lobby, FakeElement::shown());
        self.set(
            Marker::PlayerEntries,
            (0..players).map(|_| FakeElement::shown()).collect(),
        );
        self.set_one(Marker::StartButton, FakeElement::shown().with_text("Start!"));
    }

    pub fn set_chat_value(&self, value: &str) {
        self.set_one(Marker::ChatInput, FakeElement::shown().with_value(value));
    }

    fn element(&self, r: FakeRef) -> Option<FakeElement> {
        self.with_state(|s| s.elements.get(&r.marker)?.get(r.index).cloned())
    }
}

#[async_trait]
impl PageProbe for FakePage {
    type Element = FakeRef;

    async fn find(&self, marker: Marker) -> Option<FakeRef> {
        self.with_state(|s| {
            s.lookups.push(marker);
            s.elements
                .get(&marker)
                .filter(|els| !els.is_empty())
                .map(|_| FakeRef { marker, index: 0 })
        })
    }

    async fn find_all(&self, marker: Marker) -> Vec<FakeRef> {
        self.with_state(|s| {
            s.lookups.push(marker);
            let count = s.elements.get(&marker).map_or(0, Vec::len);
            (0..count).map(|index| FakeRef { marker, index }).collect()
        })
    }

    async fn is_visible(&self, element: &FakeRef) -> bool {
        self.element(*element).is_some_and(|e| e.visible)
    }

    async fn text(&self, element: &FakeRef) -> ProbeResult<String> {
        self.element(*element)
            .map(|e| e.text)
            .ok_or(ProbeError::Absent)
    }

    async fn attribute(&self, element: &FakeRef, name: &str) -> ProbeResult<Option<String>> {
        self.element(*element)
            .map(|e| e.attrs.get(name).cloned())
            .ok_or(ProbeError::Absent)
    }

    async fn input_value(&self, element: &FakeRef) -> ProbeResult<String> {
        self.element(*element)
            .map(|e| e.value)
            .ok_or(ProbeError::Absent)
    }

    async fn submit_text(&self, element: &FakeRef, text: &str) -> ProbeResult<()> {
        let target = self.element(*element).ok_or(ProbeError::Absent)?;
        if target.blocked || !target.visible {
            return Err(ProbeError::NotInteractable("covered".to_string()));
        }
        self.with_state(|s| s.submissions.push(text.to_string()));
        Ok(())
    }

    async fn click(&self, element: &FakeRef) -> ProbeResult<()> {
        let target = self.element(*element).ok_or(ProbeError::Absent)?;
        if target.blocked || !target.visible {
            return Err(ProbeError::NotInteractable("covered".to_string()));
        }
        self.with_state(|s| {
            s.clicks.push((element.marker, target.text.clone()));
            if element.marker == Marker::WordButtons
                && let Some(buttons) = s.elements.get_mut(&Marker::WordButtons)
            {
                for button in buttons.iter_mut().filter(|b| b.group == target.group) {
                    button.visible = false;
                }
            }
        });
        Ok(())
    }
}

/// Lets a test keep a handle on a page that a loop owns.
#[async_trait]
impl<T: PageProbe> PageProbe for std::sync::Arc<T> {
    type Element = T::Element;

    async fn find(&self, marker: Marker) -> Option<Self::Element> {
        (**self).find(marker).await
    }

    async fn find_all(&self, marker: Marker) -> Vec<Self::Element> {
        (**self).find_all(marker).await
    }

    async fn is_visible(&self, element: &Self::Element) -> bool {
        (**self).is_visible(element).await
    }

    async fn text(&self, element: &Self::Element) -> ProbeResult<String> {
        (**self).text(element).await
    }

    async fn attribute(&self, element: &Self::Element, name: &str) -> ProbeResult<Option<String>> {
        (**self).attribute(element, name).await
    }

    async fn input_value(&self, element: &Self::Element) -> ProbeResult<String> {
        (**self).input_value(element).await
    }

    async fn submit_text(&self, element: &Self::Element, text: &str) -> ProbeResult<()> {
        (**self).submit_text(element, text).await
    }

    async fn click(&self, element: &Self::Element) -> ProbeResult<()> {
        (**self).click(element).await
    }
}
