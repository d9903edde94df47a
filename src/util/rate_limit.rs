//! Rate limiting utilities

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter type alias
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Create a rate limiter with the specified messages per second
pub fn create_limiter(messages_per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(messages_per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Default relay limit: two 60 FPS clients sending once per frame fit comfortably
pub const RELAY_MESSAGE_RATE_LIMIT: u32 = 120;

/// Per-connection inbound limiter used by the relay
#[derive(Clone)]
pub struct PeerRateLimiter {
    limiter: Arc<Limiter>,
}

impl PeerRateLimiter {
    pub fn new(messages_per_second: u32) -> Self {
        Self {
            limiter: create_limiter(messages_per_second),
        }
    }

    /// Check if a message is allowed (returns true if allowed)
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for PeerRateLimiter {
    fn default() -> Self {
        Self::new(RELAY_MESSAGE_RATE_LIMIT)
    }
}
