//! Route handlers

pub mod reports;
pub mod sessions;
pub mod ticks;
