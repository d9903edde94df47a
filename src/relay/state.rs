//! Relay state shared across routes

use std::sync::Arc;

use crate::config::RelayConfig;

use super::rooms::RoomRegistry;

/// Shared relay state
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<RelayConfig>,
    pub rooms: Arc<RoomRegistry>,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            rooms: Arc::new(RoomRegistry::new()),
        }
    }
}
