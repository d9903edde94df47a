//! Shared utilities

pub mod color;
pub mod rate_limit;
pub mod time;
