//! Local player movement from the per-frame input snapshot

use std::f32::consts::TAU;

use crate::world::Vec2;

use super::player::PlayerState;
use super::InputSnapshot;

/// Per-frame movement integration.
///
/// Movement and turning are per-frame constants, not scaled by elapsed time,
/// so speed follows the display rate. Direction vectors are summed without
/// normalization: two held directions move faster than one.
pub struct MovementSystem;

impl MovementSystem {
    /// Summed unit displacement for the held movement actions
    pub fn displacement(angle: f32, input: &InputSnapshot) -> Vec2 {
        let facing = Vec2::from_angle(angle);
        let (sin, cos) = angle.sin_cos();
        let mut direction = Vec2::default();

        if input.forward {
            direction += facing;
        }
        if input.back {
            direction += facing * -1.0;
        }
        if input.strafe_left {
            direction += Vec2::new(sin, -cos);
        }
        if input.strafe_right {
            direction += Vec2::new(-sin, cos);
        }

        direction
    }

    /// Apply one frame of input to the player
    pub fn apply(player: &mut PlayerState, input: &InputSnapshot, turn_speed: f32) {
        // Translation uses the facing from the start of the frame
        let direction = Self::displacement(player.angle, input);

        if input.turn_left {
            player.angle -= turn_speed;
        }
        if input.turn_right {
            player.angle += turn_speed;
        }
        // Normalize to 0..2π
        player.angle = player.angle.rem_euclid(TAU);

        player.pos += direction * player.speed;
    }
}
