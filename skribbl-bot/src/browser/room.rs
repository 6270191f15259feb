//! Private room setup: the host creates and configures a room, the player
//! follows the invite link.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::time::Duration;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use tokio_util::sync::CancellationToken;

use super::session::{StartupError, WindowSlot, open_site, wait_for};
use super::webdriver::Selector;
use crate::common::pause;
use crate::config::{BotConfig, RoomSettings};

const CREATE_BUTTON: Selector = Selector::Css("#home .button-create");
const PLAY_BUTTON: Selector = Selector::Css("#home .button-play");
const CANVAS: Selector = Selector::Id("game-canvas");
const INVITE_INPUT: Selector = Selector::Id("input-invite");

/// Room setting selects and the option text each should show.
#[must_use]
pub fn setting_choices(settings: &RoomSettings) -> [(&'static str, String); 4] {
    [
        ("item-settings-drawtime", settings.draw_time_secs.to_string()),
        ("item-settings-rounds", settings.rounds.to_string()),
        ("item-settings-wordcount", settings.word_count.to_string()),
        (
            "item-settings-mode",
            settings.word_mode.option_text().to_string(),
        ),
    ]
}

/// Open the site, create a private room, configure it and return the
/// invite link.
pub async fn create_room(
    driver: &WebDriver,
    cfg: &BotConfig,
    slot: WindowSlot,
    cancel: &CancellationToken,
) -> Result<String> {
    open_site(driver, &cfg.site_url, slot, cfg.page_load_timeout(), cancel).await?;

    let create = wait_for(driver, CREATE_BUTTON, "create room button", cfg.element_wait(), cancel)
        .await?;
    create.click().await.context("clicking create room")?;
    wait_for(driver, CANVAS, "game canvas", cfg.page_load_timeout(), cancel).await?;
    if !pause(Duration::from_secs(cfg.room_settle_secs), cancel).await {
        return Err(StartupError::Cancelled.into());
    }

    for (id, text) in setting_choices(&cfg.room) {
        if let Err(e) = choose_option(driver, id, &text).await {
            warn!("room setting {id} left unchanged: {e}");
        }
    }

    let invite = read_invite(driver).await?;
    info!("room ready at {invite}");
    Ok(invite)
}

async fn choose_option(driver: &WebDriver, id: &'static str, text: &str) -> WebDriverResult<()> {
    let element = driver.find(By::Id(id)).await?;
    SelectElement::new(&element)
        .await?
        .select_by_visible_text(text)
        .await
}

async fn read_invite(driver: &WebDriver) -> Result<String> {
    let input = driver
        .find(INVITE_INPUT.by())
        .await
        .context("invite link field missing")?;
    let value = input.value().await.ok().flatten().unwrap_or_default();
    let link = if value.trim().is_empty() {
        input.text().await.unwrap_or_default()
    } else {
        value
    };
    let link = link.trim().to_string();
    if link.is_empty() {
        bail!("invite link field is empty");
    }
    Ok(link)
}

/// Follow an invite link and press play.
pub async fn join_room(
    driver: &WebDriver,
    cfg: &BotConfig,
    invite: &str,
    slot: WindowSlot,
    cancel: &CancellationToken,
) -> Result<()> {
    open_site(driver, invite, slot, cfg.page_load_timeout(), cancel).await?;
    if !pause(Duration::from_millis(cfg.join_settle_ms), cancel).await {
        return Err(StartupError::Cancelled.into());
    }
    let play = wait_for(driver, PLAY_BUTTON, "play button", cfg.element_wait(), cancel).await?;
    play.click().await.context("clicking play")?;
    info!("joined {invite}");
    Ok(())
}
