//! Fixed-step ray marching through the arena

use crate::config::GameConfig;
use crate::world::{Vec2, World};

use super::player::{PlayerColor, PlayerState};

/// What a ray ran into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitKind {
    /// Within the edge radius of an obstacle corner
    Edge,
    /// Inside an obstacle, or nothing within range
    Wall,
    /// Inside another player's hitbox
    Player(PlayerColor),
}

/// First-hit result of a single cast
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub kind: HitKind,
}

impl RayHit {
    pub fn player_color(&self) -> Option<&PlayerColor> {
        match &self.kind {
            HitKind::Player(color) => Some(color),
            _ => None,
        }
    }
}

/// Marches rays in fixed increments and classifies the first hit.
///
/// At each sample the tests run in the order edge, wall, player; the first
/// match wins. The reported distance is the distance of the sample point, so
/// it overshoots the true contact by less than one step.
#[derive(Debug, Clone, Copy)]
pub struct RayCaster<'w> {
    world: &'w World,
    step: f32,
    max_distance: f32,
    edge_radius: f32,
    player_half_width: f32,
}

impl<'w> RayCaster<'w> {
    pub fn new(world: &'w World, config: &GameConfig) -> Self {
        Self {
            world,
            step: config.step_size,
            max_distance: config.max_distance,
            edge_radius: config.edge_radius,
            player_half_width: config.player_half_width,
        }
    }

    /// Cast from `origin` along `angle`, ignoring `players[self_index]`
    pub fn cast(
        &self,
        origin: Vec2,
        angle: f32,
        players: &[PlayerState],
        self_index: usize,
    ) -> RayHit {
        let dir = Vec2::from_angle(angle);
        let mut traveled = 0.0_f32;

        while traveled < self.max_distance {
            traveled = (traveled + self.step).min(self.max_distance);
            let point = origin + dir * traveled;

            if let Some(kind) = self.classify(point, players, self_index) {
                return RayHit {
                    distance: traveled,
                    kind,
                };
            }
        }

        RayHit {
            distance: self.max_distance,
            kind: HitKind::Wall,
        }
    }

    fn classify(&self, point: Vec2, players: &[PlayerState], self_index: usize) -> Option<HitKind> {
        if self.world.near_corner(point, self.edge_radius) {
            return Some(HitKind::Edge);
        }

        if self.world.inside_obstacle(point) {
            return Some(HitKind::Wall);
        }

        let half = self.player_half_width;
        players
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self_index)
            .find(|(_, p)| (p.pos.x - point.x).abs() <= half && (p.pos.y - point.y).abs() <= half)
            .map(|(_, p)| HitKind::Player(p.color.clone()))
    }
}
