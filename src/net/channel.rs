//! Peer state channel: outbound serialization and inbound full-replace

use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::game::{PlayerColor, PlayerState};

use super::protocol::{decode, encode, PlayerMessage};

/// Transport between the two clients. Both directions are non-blocking.
pub trait PeerLink {
    /// Queue one message for the peer
    fn send(&mut self, payload: String) -> Result<(), ChannelError>;

    /// Next message received from the peer, if any
    fn try_recv(&mut self) -> Option<String>;
}

/// Channel errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("Peer channel is not open")]
    Unavailable,
}

/// Peer link over a pair of bounded tokio channels
#[derive(Debug)]
pub struct MpscLink {
    tx: mpsc::Sender<String>,
    rx: mpsc::Receiver<String>,
}

impl MpscLink {
    pub fn new(tx: mpsc::Sender<String>, rx: mpsc::Receiver<String>) -> Self {
        Self { tx, rx }
    }

    /// Two endpoints wired to each other
    pub fn pair(capacity: usize) -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::channel(capacity.max(1));
        let (b_tx, a_rx) = mpsc::channel(capacity.max(1));
        (Self::new(a_tx, a_rx), Self::new(b_tx, b_rx))
    }
}

impl PeerLink for MpscLink {
    fn send(&mut self, payload: String) -> Result<(), ChannelError> {
        // Full or closed: either way the message is not queued
        self.tx.try_send(payload).map_err(|_| ChannelError::Unavailable)
    }

    fn try_recv(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

/// Counts from one inbound drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub applied: usize,
    pub discarded: usize,
}

/// Replicates the local state out and the peer state in.
///
/// Inbound messages replace the replica wholesale in arrival order, so the
/// latest message wins. There are no sequence numbers and no merging.
/// A message claiming the local player's color is discarded: the color is
/// the player identity and must stay unique.
#[derive(Debug)]
pub struct PeerChannel<L> {
    link: L,
    max_health: u8,
    local_color: PlayerColor,
    sent: u64,
    dropped: u64,
}

impl<L: PeerLink> PeerChannel<L> {
    pub fn new(link: L, max_health: u8, local_color: PlayerColor) -> Self {
        Self {
            link,
            max_health,
            local_color,
            sent: 0,
            dropped: 0,
        }
    }

    /// Serialize and send the local state. A closed channel drops the
    /// message silently; returns whether it was queued.
    pub fn send_state(&mut self, state: &PlayerState, now: u64) -> bool {
        let payload = match encode(&PlayerMessage::from_state(state, Some(now))) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to encode local state");
                return false;
            }
        };

        match self.link.send(payload) {
            Ok(()) => {
                self.sent += 1;
                true
            }
            Err(e) => {
                self.dropped += 1;
                trace!(error = %e, dropped = self.dropped, "Dropped outbound state");
                false
            }
        }
    }

    /// Drain every pending inbound message into `replica`
    pub fn poll(&mut self, replica: &mut PlayerState) -> PollStats {
        let mut stats = PollStats::default();

        while let Some(text) = self.link.try_recv() {
            match decode(&text) {
                Ok(msg) if msg.color == self.local_color.as_str() => {
                    warn!(color = %msg.color, "Discarding peer message with the local player's color");
                    stats.discarded += 1;
                }
                Ok(msg) => {
                    msg.replace_replica(replica, self.max_health);
                    stats.applied += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Discarding malformed peer message");
                    stats.discarded += 1;
                }
            }
        }

        stats
    }

    /// Messages successfully queued so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Messages dropped because the channel was unavailable
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
