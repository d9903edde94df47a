//! Wire format for peer state replication.
//! One JSON object per message, no version or heartbeat fields.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::game::{PlayerColor, PlayerState};
use crate::world::Vec2;

/// Envelope discriminator accepted on inbound messages
pub const UPDATE_PLAYER: &str = "updatePlayer";

/// Replicated player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMessage {
    /// Position [x, y] in world pixels
    pub pos: [f32; 2],
    /// Facing in radians
    pub angle: f32,
    /// Clamped into [0, max health] when applied
    pub health: i32,
    /// Color token, also the player identity
    pub color: String,
    /// Epoch ms of the last fire-gate pass
    #[serde(deserialize_with = "epoch_millis")]
    pub cooldown: u64,
    /// Epoch ms of the last hit taken
    #[serde(alias = "hit_timer", deserialize_with = "epoch_millis")]
    pub hit_timer: u64,
    /// Sender timestamp, informational only
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_epoch_millis"
    )]
    pub time: Option<u64>,
}

/// `{ "type": "updatePlayer", "player": { ... } }`
#[derive(Debug, Deserialize)]
struct Envelope {
    player: PlayerMessage,
}

impl PlayerMessage {
    /// Snapshot the replicated fields of `state`
    pub fn from_state(state: &PlayerState, sent_at: Option<u64>) -> Self {
        Self {
            pos: [state.pos.x, state.pos.y],
            angle: state.angle,
            health: i32::from(state.health),
            color: state.color.as_str().to_string(),
            cooldown: state.last_fire_at,
            hit_timer: state.last_hit_at,
            time: sent_at,
        }
    }

    /// Overwrite `replica` with this message.
    ///
    /// Every replicated field is replaced; there is no field-level merge.
    /// `speed` is not on the wire, so the replica keeps its own.
    pub fn replace_replica(self, replica: &mut PlayerState, max_health: u8) {
        *replica = PlayerState {
            pos: Vec2::new(self.pos[0], self.pos[1]),
            angle: self.angle,
            speed: replica.speed,
            health: self.health.clamp(0, i32::from(max_health)) as u8,
            color: PlayerColor::new(self.color),
            last_fire_at: self.cooldown,
            last_hit_at: self.hit_timer,
        };
    }
}

/// Encode a message in canonical (bare, un-enveloped) form
pub fn encode(msg: &PlayerMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a bare message or an `updatePlayer` envelope
pub fn decode(text: &str) -> Result<PlayerMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ProtocolError::NotAnObject);
    }

    match value.get("type") {
        None => Ok(serde_json::from_value(value)?),
        Some(Value::String(kind)) if kind == UPDATE_PLAYER => {
            let envelope: Envelope = serde_json::from_value(value)?;
            Ok(envelope.player)
        }
        Some(other) => Err(ProtocolError::UnknownType(other.to_string())),
    }
}

fn epoch_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(D::Error::custom("timestamp must be a finite number"));
    }
    // Negative values saturate to zero
    Ok(raw.max(0.0) as u64)
}

fn optional_epoch_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<f64>::deserialize(deserializer)? {
        Some(raw) if raw.is_finite() => Ok(Some(raw.max(0.0) as u64)),
        Some(_) => Err(D::Error::custom("timestamp must be a finite number")),
        None => Ok(None),
    }
}

/// Protocol errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Malformed peer message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Peer message is not a JSON object")]
    NotAnObject,

    #[error("Unknown peer message type: {0}")]
    UnknownType(String),
}
