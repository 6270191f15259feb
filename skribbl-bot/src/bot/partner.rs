use log::debug;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// One end of the channel between the two self-play bots. Whichever bot is
/// drawing forwards the answer; the other one receives it.
#[derive(Debug)]
pub struct PartnerLink {
    outbox: UnboundedSender<String>,
    pub(crate) inbox: UnboundedReceiver<String>,
}

impl PartnerLink {
    /// Two linked ends.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = unbounded_channel();
        let (b_tx, b_rx) = unbounded_channel();
        (
            Self {
                outbox: a_tx,
                inbox: b_rx,
            },
            Self {
                outbox: b_tx,
                inbox: a_rx,
            },
        )
    }

    /// Send without waiting for, or caring about, delivery.
    pub fn forward(&self, word: &str) {
        if self.outbox.send(word.to_string()).is_err() {
            debug!("partner gone, dropped forwarded word {word}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn each_end_receives_what_the_other_forwards() {
        let (mut host, mut player) = PartnerLink::pair();
        host.forward("cat+hat");
        player.forward("kite");
        assert_eq!(player.inbox.recv().await.as_deref(), Some("cat+hat"));
        assert_eq!(host.inbox.recv().await.as_deref(), Some("kite"));
    }

    #[test]
    fn forwarding_to_a_dropped_partner_is_silent() {
        let (host, player) = PartnerLink::pair();
        drop(player);
        host.forward("lost");
    }
}
