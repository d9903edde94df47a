//! Time utilities and the clock seam used by cooldown and hit-flash gating

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Relay start time for uptime tracking
static RELAY_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize relay start time (call once at startup)
pub fn init_relay_time() {
    RELAY_START.get_or_init(Instant::now);
}

/// Get relay uptime in seconds
pub fn uptime_secs() -> u64 {
    RELAY_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Source of wall-clock timestamps (epoch milliseconds).
///
/// Every cooldown and hit-flash comparison reads time through this trait so a
/// test can step time explicitly instead of sleeping.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Clock backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        unix_millis()
    }
}

/// Manually driven clock. Cloning shares the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::Relaxed);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Milliseconds elapsed since `earlier`, zero if the clock went backwards
pub fn elapsed_since(now: u64, earlier: u64) -> u64 {
    now.saturating_sub(earlier)
}

/// Frame period for a display rate in frames per second
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(fps.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        clock.advance(250);
        assert_eq!(other.now_millis(), 1_250);
        other.set(5);
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn elapsed_saturates() {
        assert_eq!(elapsed_since(100, 400), 0);
        assert_eq!(elapsed_since(400, 100), 300);
    }

    #[test]
    fn frame_duration_at_sixty_fps() {
        assert_eq!(frame_duration(60), Duration::from_micros(16_666));
        assert_eq!(frame_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
