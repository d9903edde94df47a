//! Raycast Duel - two-player ray-marched shooter core
//!
//! - `world`: static arena geometry
//! - `game`: ray casting, projection rendering, movement, combat, frame loop
//! - `net`: peer state wire format and client-side links
//! - `relay`: WebSocket host that pairs two clients per room

pub mod config;
pub mod game;
pub mod net;
pub mod relay;
pub mod util;
pub mod world;
