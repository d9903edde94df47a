//! Game core: ray casting, rendering, movement, combat and the frame loop

pub mod combat;
pub mod controller;
pub mod player;
pub mod raycast;
pub mod render;
pub mod session;

pub use player::{PlayerColor, PlayerState};
pub use session::{FrameOutcome, Session};

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// Logical actions a player can bind to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Fire,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Forward,
        Action::Back,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Fire,
    ];
}

/// Pressed physical keys as reported by the input collaborator, by key name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pressed: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: impl Into<String>) {
        self.pressed.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.pressed.remove(key);
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }
}

impl<S: Into<String>> FromIterator<S> for KeyboardState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Produces the keyboard state once per frame
pub trait InputSource {
    fn poll_keys(&mut self) -> KeyboardState;
}

/// Keyboard state written by an input callback and read once per frame.
///
/// Clones share the same state. Every access goes through one mutex, so
/// key events from another thread never interleave with a frame's read.
#[derive(Debug, Clone, Default)]
pub struct SharedKeyboard {
    inner: Arc<Mutex<KeyboardState>>,
}

impl SharedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&self, key: impl Into<String>) {
        self.inner.lock().press(key);
    }

    pub fn key_up(&self, key: &str) {
        self.inner.lock().release(key);
    }
}

impl InputSource for SharedKeyboard {
    fn poll_keys(&mut self) -> KeyboardState {
        self.inner.lock().clone()
    }
}

/// Held state of the seven logical actions for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
}

impl InputSnapshot {
    pub fn is_active(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Back => self.back,
            Action::StrafeLeft => self.strafe_left,
            Action::StrafeRight => self.strafe_right,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
            Action::Fire => self.fire,
        }
    }

    pub fn set(&mut self, action: Action, active: bool) {
        let slot = match action {
            Action::Forward => &mut self.forward,
            Action::Back => &mut self.back,
            Action::StrafeLeft => &mut self.strafe_left,
            Action::StrafeRight => &mut self.strafe_right,
            Action::TurnLeft => &mut self.turn_left,
            Action::TurnRight => &mut self.turn_right,
            Action::Fire => &mut self.fire,
        };
        *slot = active;
    }

    /// Snapshot with exactly the given actions held
    pub fn with(actions: &[Action]) -> Self {
        let mut snapshot = Self::default();
        for action in actions {
            snapshot.set(*action, true);
        }
        snapshot
    }
}

/// Maps each logical action to a physical key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBinding {
    pub forward: String,
    pub back: String,
    pub strafe_left: String,
    pub strafe_right: String,
    pub turn_left: String,
    pub turn_right: String,
    pub fire: String,
}

impl Default for ControlBinding {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            back: "s".to_string(),
            strafe_left: "a".to_string(),
            strafe_right: "d".to_string(),
            turn_left: "q".to_string(),
            turn_right: "e".to_string(),
            fire: " ".to_string(),
        }
    }
}

impl ControlBinding {
    pub fn key_for(&self, action: Action) -> &str {
        match action {
            Action::Forward => &self.forward,
            Action::Back => &self.back,
            Action::StrafeLeft => &self.strafe_left,
            Action::StrafeRight => &self.strafe_right,
            Action::TurnLeft => &self.turn_left,
            Action::TurnRight => &self.turn_right,
            Action::Fire => &self.fire,
        }
    }

    /// Resolve the keyboard state into logical actions
    pub fn snapshot(&self, keys: &KeyboardState) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for action in Action::ALL {
            snapshot.set(action, keys.is_pressed(self.key_for(action)));
        }
        snapshot
    }
}
