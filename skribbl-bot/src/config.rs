use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skribbl_engine::{COMBINATION_DELIMITER, DelayRange, GUESS_DELAY_RANGES, OverlayRule};
use std::path::Path;
use std::time::Duration;

use crate::common::RetryPolicy;

/// Word mode of a private room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordMode {
    Normal,
    Hidden,
    Combination,
}

impl WordMode {
    /// Text of the option in the room settings select.
    #[must_use]
    pub const fn option_text(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hidden => "Hidden",
            Self::Combination => "Combination",
        }
    }

    /// Number of words the drawer picks on the selection screen.
    #[must_use]
    pub const fn words_to_pick(self) -> usize {
        match self {
            Self::Combination => 2,
            Self::Normal | Self::Hidden => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    pub draw_time_secs: u32,
    pub rounds: u32,
    pub word_count: u32,
    pub word_mode: WordMode,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            draw_time_secs: 15,
            rounds: 10,
            word_count: 5,
            word_mode: WordMode::Combination,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// Timings and game settings shared by every bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub site_url: String,
    pub tick_ms: u64,
    pub page_load_timeout_secs: u64,
    pub element_wait_secs: u64,
    pub room_settle_secs: u64,
    pub join_settle_ms: u64,
    pub word_select_retry: RetryPolicy,
    pub lobby_start_retry: RetryPolicy,
    /// Start attempts per host tick once a finished game drops back to the
    /// lobby. Kept short so the loop keeps polling.
    pub lobby_restart_retry: RetryPolicy,
    pub overlay_wait_ms: u64,
    pub guess_delays: [DelayRange; 3],
    pub overlay_rule: OverlayRule,
    pub word_delimiter: String,
    pub room: RoomSettings,
    pub window: WindowSize,
    pub seed: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            site_url: "https://skribbl.io/".to_string(),
            tick_ms: 400,
            page_load_timeout_secs: 10,
            element_wait_secs: 3,
            room_settle_secs: 3,
            join_settle_ms: 1000,
            word_select_retry: RetryPolicy::new(10, 250),
            lobby_start_retry: RetryPolicy::new(120, 1000),
            lobby_restart_retry: RetryPolicy::new(3, 500),
            overlay_wait_ms: 250,
            guess_delays: GUESS_DELAY_RANGES,
            overlay_rule: OverlayRule::default(),
            word_delimiter: COMBINATION_DELIMITER.to_string(),
            room: RoomSettings::default(),
            window: WindowSize::default(),
            seed: None,
        }
    }
}

impl BotConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[must_use]
    pub const fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub const fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    #[must_use]
    pub const fn overlay_wait(&self) -> Duration {
        Duration::from_millis(self.overlay_wait_ms)
    }
}
