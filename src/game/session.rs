//! Frame loop driver: one local player, one peer replica, one frame at a time

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::net::{PeerChannel, PeerLink};
use crate::util::time::{frame_duration, Clock};
use crate::world::World;

use super::combat::{CombatSystem, FireOutcome};
use super::controller::MovementSystem;
use super::player::{PlayerColor, PlayerState};
use super::raycast::RayCaster;
use super::render::{Renderer, Surface};
use super::{InputSource, KeyboardState};

/// Index of the authoritative local player
pub const LOCAL: usize = 0;
/// Index of the non-authoritative peer replica
pub const PEER: usize = 1;

/// Blocking acknowledgment shown to the local player when they win
pub trait WinPresenter {
    fn acknowledge_win(&mut self, winner: &PlayerColor);
}

impl<F: FnMut(&PlayerColor)> WinPresenter for F {
    fn acknowledge_win(&mut self, winner: &PlayerColor) {
        self(winner)
    }
}

/// What a frame did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Normal frame; `fire` is set when the fire action was held
    Continued { fire: Option<FireOutcome> },
    /// The local player won; all state was reset
    Reset { winner: PlayerColor },
}

/// One client's game: owns the local player and the peer replica.
///
/// Access is exclusive through `&mut self`, so a multi-threaded host gets the
/// single-writer guarantee by owning the session on one task and feeding it
/// through queues (`PeerLink`, `InputSource`).
pub struct Session<L, C> {
    config: GameConfig,
    world: World,
    renderer: Renderer,
    channel: PeerChannel<L>,
    clock: C,
    players: [PlayerState; 2],
    frame: u64,
    matches_won: u32,
}

impl<L: PeerLink, C: Clock> Session<L, C> {
    /// Validate the configuration and build the starting state
    pub fn new(config: GameConfig, link: L, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = World::new(config.obstacles.clone())?;

        info!(
            local = %config.local_color,
            peer = %config.peer_color,
            obstacles = world.obstacles().len(),
            "Session created"
        );

        Ok(Self {
            renderer: Renderer::new(&config),
            channel: PeerChannel::new(
                link,
                config.max_health,
                PlayerColor::new(config.local_color.as_str()),
            ),
            players: initial_players(&config),
            world,
            clock,
            config,
            frame: 0,
            matches_won: 0,
        })
    }

    pub fn local(&self) -> &PlayerState {
        &self.players[LOCAL]
    }

    pub fn peer(&self) -> &PlayerState {
        &self.players[PEER]
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn channel(&self) -> &PeerChannel<L> {
        &self.channel
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn matches_won(&self) -> u32 {
        self.matches_won
    }

    /// Restore both players to their starting state
    pub fn reset(&mut self) {
        self.players = initial_players(&self.config);
        debug!(frame = self.frame, "Player state reset");
    }

    /// Run one frame: clear, drain inbound, move, fire, send, render, HUD
    pub fn tick(
        &mut self,
        surface: &mut impl Surface,
        keys: &KeyboardState,
        presenter: &mut impl WinPresenter,
    ) -> FrameOutcome {
        let now = self.clock.now_millis();
        self.frame += 1;

        self.renderer.clear(surface);

        let inbound = self.channel.poll(&mut self.players[PEER]);
        if inbound.applied + inbound.discarded > 0 {
            trace!(applied = inbound.applied, discarded = inbound.discarded, "Inbound drained");
        }

        let input = self.config.binding.snapshot(keys);
        MovementSystem::apply(&mut self.players[LOCAL], &input, self.config.turn_speed);

        let caster = RayCaster::new(&self.world, &self.config);
        let fire = input.fire.then(|| {
            CombatSystem::try_fire(
                &caster,
                &mut self.players,
                LOCAL,
                now,
                self.config.cooldown_ms,
            )
        });

        if let Some(outcome) = fire.as_ref().filter(|o| o.fired()) {
            trace!(frame = self.frame, outcome = ?outcome, "Fire gate passed");
        }

        // Only our own hit resolution can end the match; a replicated
        // health of zero never does
        if let Some(FireOutcome::Win { winner, .. }) = &fire {
            let winner = winner.clone();
            info!(winner = %winner, frame = self.frame, "Match won");
            presenter.acknowledge_win(&winner);
            self.matches_won += 1;
            self.reset();
            return FrameOutcome::Reset { winner };
        }

        self.channel.send_state(&self.players[LOCAL], now);

        self.renderer
            .draw_view(surface, &caster, &self.players, LOCAL, now);
        self.renderer.draw_hud(surface, &self.players);

        FrameOutcome::Continued { fire }
    }

    /// Drive frames at the configured display rate until the future is dropped
    pub async fn run(
        &mut self,
        surface: &mut impl Surface,
        input: &mut impl InputSource,
        presenter: &mut impl WinPresenter,
    ) {
        let mut ticker = interval(frame_duration(self.config.fps));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(fps = self.config.fps, "Frame loop started");

        loop {
            ticker.tick().await;

            let keys = input.poll_keys();
            if let FrameOutcome::Reset { winner } = self.tick(surface, &keys, presenter) {
                info!(winner = %winner, "Restarting frame loop after win");
            }
        }
    }
}

fn initial_players(config: &GameConfig) -> [PlayerState; 2] {
    [
        PlayerState::new(
            config.local_spawn,
            config.player_speed,
            config.max_health,
            PlayerColor::new(config.local_color.as_str()),
        ),
        PlayerState::new(
            config.peer_spawn,
            config.player_speed,
            config.max_health,
            PlayerColor::new(config.peer_color.as_str()),
        ),
    ]
}
