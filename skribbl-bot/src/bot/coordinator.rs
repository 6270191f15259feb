//! Session wiring for solo play and the two-bot self-play scraper.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use skribbl_engine::{EncounterLog, Vocabulary};
use std::path::PathBuf;
use std::sync::Arc;
use thirtyfour::WebDriver;
use tokio_util::sync::CancellationToken;

use super::game_loop::{GameLoop, GuessStrategy, LoopStats, Role};
use super::lobby::{MIN_PLAYERS, StartOutcome, start_game};
use super::partner::PartnerLink;
use crate::browser::session::open_site;
use crate::browser::{
    BrowserConfig, BrowserKind, PageProbe, WebDriverProbe, WindowSlot, create_room, join_room,
    new_session,
};
use crate::common::{artifacts_dir, capture_artifacts};
use crate::config::BotConfig;

/// Everything needed to open browser sessions for a run.
#[derive(Debug, Clone)]
pub struct BotSetup {
    pub kind: BrowserKind,
    pub browser: BrowserConfig,
    pub bot: BotConfig,
    pub artifacts_base: String,
}

impl BotSetup {
    fn browser_label(&self) -> String {
        format!("{:?}", self.kind).to_lowercase()
    }

    const fn slot(&self, index: u32) -> WindowSlot {
        WindowSlot {
            index,
            size: self.bot.window,
        }
    }

    /// Save artifacts for a failed startup step and hand the error back.
    async fn fail(&self, driver: &WebDriver, role: Role, err: anyhow::Error) -> anyhow::Error {
        let dir = artifacts_dir(&self.artifacts_base, &self.browser_label(), role.label());
        match capture_artifacts(driver, &dir, &err).await {
            Ok(()) => warn!("{}: startup failed, artifacts in {dir}", role.label()),
            Err(e) => warn!("{}: could not save artifacts: {e:#}", role.label()),
        }
        err
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfPlaySummary {
    pub host: LoopStats,
    pub player: LoopStats,
}

/// Run both loops as separate tasks until `cancel` fires.
pub async fn run_pair<P>(
    host: GameLoop<P>,
    player: GameLoop<P>,
    cancel: CancellationToken,
) -> SelfPlaySummary
where
    P: PageProbe + 'static,
{
    let spawn = |mut bot: GameLoop<P>| {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            bot.run(&cancel).await;
            bot.stats()
        })
    };
    let (host, player) = tokio::join!(spawn(host), spawn(player));

    let stats = |joined: Result<LoopStats, tokio::task::JoinError>, role: &str| {
        joined.unwrap_or_else(|e| {
            warn!("{role} loop ended abnormally: {e}");
            LoopStats::default()
        })
    };
    SelfPlaySummary {
        host: stats(host, "host"),
        player: stats(player, "player"),
    }
}

/// Host a private room with two browsers, let them play each other and log
/// every word offered to either drawer.
pub async fn run_self_play(
    setup: &BotSetup,
    encounters: PathBuf,
    cancel: CancellationToken,
) -> Result<SelfPlaySummary> {
    let host_driver = new_session(setup.kind, &setup.browser)
        .await
        .context("starting host browser")?;
    let player_driver = match new_session(setup.kind, &setup.browser).await {
        Ok(driver) => driver,
        Err(e) => {
            let _ = host_driver.quit().await;
            return Err(e).context("starting player browser");
        }
    };

    let result = drive_self_play(setup, &host_driver, &player_driver, encounters, cancel).await;
    let _ = host_driver.quit().await;
    let _ = player_driver.quit().await;
    result
}

async fn drive_self_play(
    setup: &BotSetup,
    host_driver: &WebDriver,
    player_driver: &WebDriver,
    encounters: PathBuf,
    cancel: CancellationToken,
) -> Result<SelfPlaySummary> {
    let invite = match create_room(host_driver, &setup.bot, setup.slot(0), &cancel).await {
        Ok(invite) => invite,
        Err(e) => return Err(setup.fail(host_driver, Role::Host, e).await),
    };
    if let Err(e) = join_room(player_driver, &setup.bot, &invite, setup.slot(1), &cancel).await {
        return Err(setup.fail(player_driver, Role::Player, e).await);
    }

    let host_probe = WebDriverProbe::new(host_driver.clone());
    match start_game(&host_probe, MIN_PLAYERS, setup.bot.lobby_start_retry, &cancel).await {
        StartOutcome::Started { .. } => {}
        StartOutcome::TimedOut => bail!("player never appeared in the lobby"),
        StartOutcome::Cancelled => return Ok(SelfPlaySummary::default()),
    }

    let log = Arc::new(EncounterLog::new(encounters));
    info!("logging offered words to {}", log.path().display());
    let (host_link, player_link) = PartnerLink::pair();

    let mut player_cfg = setup.bot.clone();
    player_cfg.seed = setup.bot.seed.map(|seed| seed.wrapping_add(1));

    let host = GameLoop::new(
        Role::Host,
        host_probe,
        setup.bot.clone(),
        GuessStrategy::Partner,
    )
    .with_partner(host_link)
    .with_encounters(log.clone());
    let player = GameLoop::new(
        Role::Player,
        WebDriverProbe::new(player_driver.clone()),
        player_cfg,
        GuessStrategy::Partner,
    )
    .with_partner(player_link)
    .with_encounters(log);

    Ok(run_pair(host, player, cancel).await)
}

/// Play next to a human, guessing from hints. Joins `invite` when given,
/// otherwise stops at the home screen and waits for the human to start.
pub async fn run_solo(
    setup: &BotSetup,
    vocabulary: Arc<Vocabulary>,
    invite: Option<&str>,
    cancel: CancellationToken,
) -> Result<LoopStats> {
    let driver = new_session(setup.kind, &setup.browser)
        .await
        .context("starting browser")?;

    let opened = match invite {
        Some(link) => join_room(&driver, &setup.bot, link, setup.slot(0), &cancel).await,
        None => {
            open_site(
                &driver,
                &setup.bot.site_url,
                setup.slot(0),
                setup.bot.page_load_timeout(),
                &cancel,
            )
            .await
        }
    };
    if let Err(e) = opened {
        let err = setup.fail(&driver, Role::Solo, e).await;
        let _ = driver.quit().await;
        return Err(err);
    }

    let mut bot = GameLoop::new(
        Role::Solo,
        WebDriverProbe::new(driver.clone()),
        setup.bot.clone(),
        GuessStrategy::Hints(vocabulary),
    );
    bot.run(&cancel).await;
    let _ = driver.quit().await;
    Ok(bot.stats())
}
