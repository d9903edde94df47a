//! Configuration: relay settings from the environment, game tuning with
//! canonical defaults

use std::env;
use std::f32::consts::PI;
use std::net::SocketAddr;

use crate::game::ControlBinding;
use crate::util::rate_limit::RELAY_MESSAGE_RATE_LIMIT;
use crate::world::{default_obstacles, Obstacle, Vec2};

/// Relay configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Relay binding address
    pub relay_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
    /// Allowed client origins for CORS (`*` allows any)
    pub client_origin: String,
    /// Inbound messages per second accepted from one connection
    pub max_messages_per_sec: u32,
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to RELAY_ADDR or default
        let relay_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("RELAY_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let max_messages_per_sec = match lookup("RELAY_MAX_MESSAGES_PER_SEC") {
            Some(raw) => raw.parse::<u32>().ok().filter(|v| *v > 0).ok_or(
                ConfigError::InvalidValue {
                    key: "RELAY_MAX_MESSAGES_PER_SEC",
                    value: raw,
                },
            )?,
            None => RELAY_MESSAGE_RATE_LIMIT,
        };

        Ok(Self {
            relay_addr: relay_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            client_origin: lookup("CLIENT_ORIGIN").unwrap_or_else(|| "*".to_string()),
            max_messages_per_sec,
        })
    }
}

/// Game tuning. `Default` yields the canonical arena and constants.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Drawing surface width in pixels
    pub view_width: f32,
    /// Drawing surface height in pixels
    pub view_height: f32,
    /// Ray march increment in world units
    pub step_size: f32,
    /// Maximum ray range in world units
    pub max_distance: f32,
    /// Distance below which a march point counts as touching a corner
    pub edge_radius: f32,
    /// Half-width of the square hitbox around a player
    pub player_half_width: f32,
    /// Rays per rendered frame
    pub num_rays: u32,
    /// Field of view in radians
    pub fov: f32,
    /// Turn increment per frame in radians
    pub turn_speed: f32,
    /// Movement per frame per active direction
    pub player_speed: f32,
    pub max_health: u8,
    /// Minimum milliseconds between fire-gate passes
    pub cooldown_ms: u64,
    /// Milliseconds a struck player is drawn in the flash color
    pub hit_flash_ms: u64,
    /// Display-synchronized frame rate
    pub fps: u32,
    pub obstacles: Vec<Obstacle>,
    pub binding: ControlBinding,
    pub local_spawn: Vec2,
    pub peer_spawn: Vec2,
    pub local_color: String,
    pub peer_color: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        let (width, height) = (800.0, 600.0);
        Self {
            view_width: width,
            view_height: height,
            step_size: 5.0,
            max_distance: 300.0,
            edge_radius: 5.0,
            player_half_width: 5.0,
            num_rays: 120,
            fov: PI / 3.0,
            turn_speed: 0.05,
            player_speed: 2.0,
            max_health: 3,
            cooldown_ms: 2000,
            hit_flash_ms: 1000,
            fps: 60,
            obstacles: default_obstacles(width, height),
            binding: ControlBinding::default(),
            local_spawn: Vec2::new(width / 4.0, height / 2.0),
            peer_spawn: Vec2::new(3.0 * width / 4.0, height / 2.0),
            local_color: "red".to_string(),
            peer_color: "blue".to_string(),
        }
    }
}

impl GameConfig {
    /// Same tuning with the two identities swapped, for the second client
    pub fn mirrored(mut self) -> Self {
        std::mem::swap(&mut self.local_spawn, &mut self.peer_spawn);
        std::mem::swap(&mut self.local_color, &mut self.peer_color);
        self
    }

    /// Reject settings the frame loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("step_size", self.step_size),
            ("max_distance", self.max_distance),
            ("fov", self.fov),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidGame(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.num_rays == 0 {
            return Err(ConfigError::InvalidGame("num_rays must be at least 1".into()));
        }
        if self.max_health == 0 {
            return Err(ConfigError::InvalidGame("max_health must be at least 1".into()));
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidGame("fps must be at least 1".into()));
        }
        if self.local_color == self.peer_color {
            return Err(ConfigError::InvalidGame(
                "local and peer colors must differ, the color is the player identity".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid relay address format")]
    InvalidAddress,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid obstacle #{index}: {reason}")]
    InvalidObstacle { index: usize, reason: String },

    #[error("Invalid game configuration: {0}")]
    InvalidGame(String),
}
