use log::{debug, info, warn};
use std::time::Duration;
use thirtyfour::prelude::*;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::webdriver::Selector;
use crate::common::{RetryOutcome, RetryPolicy, retry_until};
use crate::config::WindowSize;

const HOME: Selector = Selector::Id("home");
const CONSENT_BUTTON: Selector = Selector::Id("cmpwelcomebtnyes");
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Firefox,
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub implicit_wait_secs: u64,
    pub remote_hub: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        // Phase polling expects lookups of hidden markers to fail fast.
        Self {
            headless: false,
            implicit_wait_secs: 0,
            remote_hub: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{what} did not appear within {waited:?}")]
    PageNotReady { what: &'static str, waited: Duration },
    #[error("startup cancelled")]
    Cancelled,
}

pub async fn new_session(kind: BrowserKind, cfg: &BrowserConfig) -> WebDriverResult<WebDriver> {
    let driver = match kind {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if cfg.headless {
                caps.set_headless()?;
            }

            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:9515");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            if cfg.headless {
                caps.set_headless()?;
            }

            let url = cfg
                .remote_hub
                .as_deref()
                .unwrap_or("http://localhost:17556");
            WebDriver::new(url, caps).await?
        }
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if cfg.headless {
                caps.set_headless()?;
            }

            let url = cfg.remote_hub.as_deref().unwrap_or("http://localhost:4444");
            WebDriver::new(url, caps).await?
        }
    };

    driver
        .set_implicit_wait_timeout(Duration::from_secs(cfg.implicit_wait_secs))
        .await?;
    Ok(driver)
}

/// Screen slot of a bot window; the second bot sits right of the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSlot {
    pub index: u32,
    pub size: WindowSize,
}

impl WindowSlot {
    #[must_use]
    pub const fn origin(self) -> (i64, i64) {
        (self.index as i64 * self.size.width as i64, 0)
    }
}

/// Poll for `selector` until it is found and displayed.
pub async fn wait_for(
    driver: &WebDriver,
    selector: Selector,
    what: &'static str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<WebElement, StartupError> {
    let policy = RetryPolicy::within(timeout, POLL_INTERVAL);
    let outcome = retry_until(policy, cancel, |_| async move {
        let element = driver.find(selector.by()).await.ok()?;
        element
            .is_displayed()
            .await
            .unwrap_or(false)
            .then_some(element)
    })
    .await;
    match outcome {
        RetryOutcome::Success(element) => Ok(element),
        RetryOutcome::Exhausted => Err(StartupError::PageNotReady {
            what,
            waited: timeout,
        }),
        RetryOutcome::Cancelled => Err(StartupError::Cancelled),
    }
}

/// Place the window, load `url` and wait for the home screen. The home
/// screen never appearing is the one fatal startup condition.
pub async fn open_site(
    driver: &WebDriver,
    url: &str,
    slot: WindowSlot,
    page_load_timeout: Duration,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let (x, y) = slot.origin();
    if let Err(e) = driver
        .set_window_rect(x, y, slot.size.width, slot.size.height)
        .await
    {
        debug!("window placement ignored: {e}");
    }

    driver.goto(url).await?;
    wait_for(driver, HOME, "home screen", page_load_timeout, cancel).await?;

    if let Ok(consent) = driver.find(CONSENT_BUTTON.by()).await {
        match consent.click().await {
            Ok(()) => debug!("cookie consent dismissed"),
            Err(e) => debug!("cookie consent not clickable: {e}"),
        }
    }

    let title = driver.title().await.unwrap_or_default();
    if title.to_lowercase().contains("skribbl") {
        info!("loaded {url}");
    } else {
        warn!("unexpected page title {title:?} at {url}");
    }
    Ok(())
}
