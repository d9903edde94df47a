//! Peer relay: a WebSocket host that pairs two clients per room and forwards
//! their state messages verbatim

pub mod handler;
pub mod rooms;
pub mod routes;
pub mod state;

pub use rooms::RoomRegistry;
pub use routes::build_router;
pub use state::RelayState;
