//! Proctoring Monitor
//!
//! Drives the event core once per tick:
//! - [`ProctorEngine`]: face signal, cooldowns and session aggregation behind one value
//! - [`MonitorLoop`]: pulls frames, runs the perception adapters, feeds the engine
//!
//! Perception failures never stop the loop; they degrade the tick to a
//! no-detection tick.

mod engine;
mod runner;

pub use engine::{EngineConfig, LiveStatus, Observation, ProctorEngine, SharedEngine};
pub use runner::{LoopConfig, MonitorHandle, MonitorLoop};

use perception::PerceptionError;
use thiserror::Error;

/// Monitor errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Adapter unavailable ({0}): {1}")]
    AdapterUnavailable(&'static str, PerceptionError),
}
