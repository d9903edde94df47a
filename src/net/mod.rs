//! Peer replication: wire protocol and client-side links

pub mod channel;
pub mod protocol;

pub use channel::{ChannelError, MpscLink, PeerChannel, PeerLink, PollStats};
pub use protocol::{PlayerMessage, ProtocolError};
