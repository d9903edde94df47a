//! Combat: cooldown-gated hitscan fire, damage and win detection

use tracing::{debug, info};

use crate::util::time::elapsed_since;

use super::player::{PlayerColor, PlayerState};
use super::raycast::{HitKind, RayCaster};

/// Result of a fire attempt
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// Cooldown still running; nothing changed
    CoolingDown,
    /// Gate passed, ray stopped on geometry or ran out of range
    Miss { distance: f32, kind: HitKind },
    /// Gate passed and a player lost one health
    Hit {
        target: PlayerColor,
        remaining_health: u8,
        distance: f32,
    },
    /// The hit took the target from 1 to 0 health
    Win {
        winner: PlayerColor,
        defeated: PlayerColor,
    },
}

impl FireOutcome {
    /// True if the cooldown gate was passed
    pub fn fired(&self) -> bool {
        !matches!(self, FireOutcome::CoolingDown)
    }
}

/// Combat rules
pub struct CombatSystem;

impl CombatSystem {
    /// Check if a player can fire (strictly more than the cooldown has elapsed)
    pub fn can_fire(last_fire_at: u64, now: u64, cooldown_ms: u64) -> bool {
        elapsed_since(now, last_fire_at) > cooldown_ms
    }

    /// Apply one point of damage, returns (new_health, reached_zero).
    ///
    /// `reached_zero` is only true on the 1 -> 0 transition, so a target
    /// already at zero can never produce a second win.
    pub fn apply_damage(health: u8) -> (u8, bool) {
        if health == 0 {
            return (0, false);
        }
        let new_health = health - 1;
        (new_health, new_health == 0)
    }

    /// Resolve a fire action by `players[shooter_index]` at time `now`.
    ///
    /// Every attempt that passes the cooldown gate resets the shooter's
    /// baseline, hit or miss. Attempts inside the cooldown are ignored.
    pub fn try_fire(
        caster: &RayCaster<'_>,
        players: &mut [PlayerState],
        shooter_index: usize,
        now: u64,
        cooldown_ms: u64,
    ) -> FireOutcome {
        let Some(shooter) = players.get(shooter_index) else {
            return FireOutcome::CoolingDown;
        };

        if !Self::can_fire(shooter.last_fire_at, now, cooldown_ms) {
            return FireOutcome::CoolingDown;
        }

        let hit = caster.cast(shooter.pos, shooter.angle, players, shooter_index);
        let winner = shooter.color.clone();
        players[shooter_index].last_fire_at = now;

        let target_color = match hit.kind {
            HitKind::Player(color) => color,
            kind => {
                debug!(shooter = %winner, distance = hit.distance, kind = ?kind, "Shot missed");
                return FireOutcome::Miss {
                    distance: hit.distance,
                    kind,
                };
            }
        };

        let Some(target) = players
            .iter_mut()
            .enumerate()
            .find(|(i, p)| *i != shooter_index && p.color == target_color)
            .map(|(_, p)| p)
        else {
            return FireOutcome::Miss {
                distance: hit.distance,
                kind: HitKind::Player(target_color),
            };
        };

        let (new_health, reached_zero) = Self::apply_damage(target.health);
        target.health = new_health;
        target.last_hit_at = now;

        info!(
            shooter = %winner,
            target = %target_color,
            health = new_health,
            distance = hit.distance,
            "Hit registered"
        );

        if reached_zero {
            info!(winner = %winner, defeated = %target_color, "Target defeated");
            FireOutcome::Win {
                winner,
                defeated: target_color,
            }
        } else {
            FireOutcome::Hit {
                target: target_color,
                remaining_health: new_health,
                distance: hit.distance,
            }
        }
    }
}
