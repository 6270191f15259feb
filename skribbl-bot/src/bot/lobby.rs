use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::browser::{Marker, PageProbe};
use crate::common::{Attempt, Retry, RetryPolicy};

/// Host plus the partner bot.
pub const MIN_PLAYERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { players: usize },
    /// Not enough players joined, or the button never took the click.
    TimedOut,
    Cancelled,
}

/// Wait for at least `min_players` in the room list, then press start. An
/// intercepted click is retried on the next attempt.
pub async fn start_game<P: PageProbe + ?Sized>(
    probe: &P,
    min_players: usize,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> StartOutcome {
    let mut retry = Retry::new(policy);
    loop {
        match retry.next_attempt(cancel).await {
            Attempt::Go(_) => {}
            Attempt::Exhausted => return StartOutcome::TimedOut,
            Attempt::Cancelled => return StartOutcome::Cancelled,
        }

        let players = probe.find_all(Marker::PlayerEntries).await.len();
        if players < min_players {
            debug!("lobby has {players}/{min_players} players");
            continue;
        }
        let Some(button) = probe.find(Marker::StartButton).await else {
            continue;
        };
        match probe.click(&button).await {
            Ok(()) => {
                info!("game started with {players} players");
                return StartOutcome::Started { players };
            }
            Err(e) => debug!("start button not clickable: {e}"),
        }
    }
}
