//! Player state shared by the local player and the peer replica

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::color::Rgb;
use crate::world::Vec2;

/// Color token that doubles as the player's identity for hit attribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerColor(String);

impl PlayerColor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render color; unknown tokens draw white
    pub fn rgb(&self) -> Rgb {
        Rgb::parse(&self.0).unwrap_or(Rgb::WHITE)
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerColor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Full state of one player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pos: Vec2,
    /// Facing angle in radians
    pub angle: f32,
    /// Displacement per frame per active movement action
    pub speed: f32,
    pub health: u8,
    pub color: PlayerColor,
    /// Epoch ms of the last fire-gate pass
    pub last_fire_at: u64,
    /// Epoch ms of the last hit taken
    pub last_hit_at: u64,
}

impl PlayerState {
    pub fn new(pos: Vec2, speed: f32, health: u8, color: PlayerColor) -> Self {
        Self {
            pos,
            angle: 0.0,
            speed,
            health,
            color,
            last_fire_at: 0,
            last_hit_at: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}
