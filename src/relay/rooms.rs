//! Two-slot relay rooms and the registry that owns them

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::net::ChannelError;

/// Peers per room
pub const ROOM_CAPACITY: usize = 2;

/// A connected peer's outbound queue
#[derive(Debug, Clone)]
pub struct Slot {
    pub peer_id: Uuid,
    pub tx: mpsc::Sender<String>,
}

/// One duel: at most two peers
#[derive(Debug, Default)]
pub struct Room {
    slots: [Option<Slot>; ROOM_CAPACITY],
}

impl Room {
    pub fn occupancy(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy() == 0
    }

    fn join(&mut self, slot: Slot) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(slot);
        Some(index)
    }

    fn leave(&mut self, peer_id: Uuid) -> bool {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|s| s.peer_id == peer_id) {
                *slot = None;
                return true;
            }
        }
        false
    }

    fn other(&self, peer_id: Uuid) -> Option<&Slot> {
        self.slots.iter().flatten().find(|s| s.peer_id != peer_id)
    }
}

/// Room join errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("Room {0:?} already has two peers")]
    RoomFull(String),
}

/// Registry of all active rooms
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Take a free slot in `room`, creating the room if needed
    pub fn join(&self, room: &str, peer_id: Uuid, tx: mpsc::Sender<String>) -> Result<usize, JoinError> {
        let mut entry = self.rooms.entry(room.to_string()).or_default();
        entry
            .join(Slot { peer_id, tx })
            .ok_or_else(|| JoinError::RoomFull(room.to_string()))
    }

    /// Free the peer's slot; empty rooms are removed
    pub fn leave(&self, room: &str, peer_id: Uuid) -> bool {
        let removed = self
            .rooms
            .get_mut(room)
            .map(|mut r| r.leave(peer_id))
            .unwrap_or(false);

        self.rooms.remove_if(room, |_, r| r.is_empty());
        removed
    }

    /// Forward a payload to the other peer in the room, never waiting
    pub fn forward(&self, room: &str, from: Uuid, payload: String) -> Result<(), ChannelError> {
        let target = self
            .rooms
            .get(room)
            .and_then(|r| r.other(from).map(|s| s.tx.clone()))
            .ok_or(ChannelError::Unavailable)?;

        target.try_send(payload).map_err(|_| ChannelError::Unavailable)
    }

    pub fn active_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn total_peers(&self) -> usize {
        self.rooms.iter().map(|r| r.value().occupancy()).sum()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn peer() -> (Uuid, mpsc::Sender<String>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(4);
        (Uuid::new_v4(), tx, rx)
    }

    #[test]
    fn third_peer_is_rejected() {
        let registry = RoomRegistry::new();
        let (a, a_tx, _a_rx) = peer();
        let (b, b_tx, _b_rx) = peer();
        let (c, c_tx, _c_rx) = peer();

        assert_eq!(registry.join("duel", a, a_tx), Ok(0));
        assert_eq!(registry.join("duel", b, b_tx), Ok(1));
        assert_eq!(
            registry.join("duel", c, c_tx),
            Err(JoinError::RoomFull("duel".into()))
        );
        assert_eq!(registry.total_peers(), 2);
    }

    #[test]
    fn forwards_to_the_other_peer_only() {
        let registry = RoomRegistry::new();
        let (a, a_tx, mut a_rx) = peer();
        let (b, b_tx, mut b_rx) = peer();
        assert_ok!(registry.join("duel", a, a_tx));
        assert_ok!(registry.join("duel", b, b_tx));

        assert_ok!(registry.forward("duel", a, "from a".into()));
        assert_eq!(b_rx.try_recv().ok().as_deref(), Some("from a"));
        assert!(a_rx.try_recv().is_err());
    }

    #[test]
    fn forward_without_peer_is_unavailable() {
        let registry = RoomRegistry::new();
        let (a, a_tx, _a_rx) = peer();
        assert_ok!(registry.join("solo", a, a_tx));

        assert_err!(registry.forward("solo", a, "hello?".into()));
        assert_err!(registry.forward("missing", a, "hello?".into()));
    }

    #[test]
    fn slot_is_reused_and_empty_rooms_vanish() {
        let registry = RoomRegistry::new();
        let (a, a_tx, _a_rx) = peer();
        let (b, b_tx, _b_rx) = peer();
        let (c, c_tx, _c_rx) = peer();
        assert_ok!(registry.join("duel", a, a_tx));
        assert_ok!(registry.join("duel", b, b_tx));

        assert!(registry.leave("duel", a));
        assert_eq!(registry.join("duel", c, c_tx), Ok(0));

        assert!(registry.leave("duel", b));
        assert!(registry.leave("duel", c));
        assert!(!registry.leave("duel", c));
        assert_eq!(registry.active_rooms(), 0);
    }

    #[test]
    fn rooms_are_isolated() {
        let registry = RoomRegistry::new();
        let (a, a_tx, _a_rx) = peer();
        let (b, b_tx, mut b_rx) = peer();
        assert_ok!(registry.join("one", a, a_tx));
        assert_ok!(registry.join("two", b, b_tx));

        assert_err!(registry.forward("one", a, "x".into()));
        assert!(b_rx.try_recv().is_err());
        assert_eq!(registry.active_rooms(), 2);
    }
}
