//! Forecast bucketing engine for wxday
//!
//! Turns the chronological 3-hour samples of a "5-day / 3-hour" forecast
//! payload into one entry per day for the noon and evening day-parts, plus
//! a "current weather" snapshot for the presentation layer.

pub mod bucket;
pub mod classify;
pub mod current;
pub mod engine;
pub mod icons;
pub mod payload;
pub mod pipeline;
pub mod types;
pub mod units;

pub use bucket::*;
pub use classify::*;
pub use current::*;
pub use engine::*;
pub use icons::*;
pub use payload::*;
pub use pipeline::*;
pub use types::*;
pub use units::*;

use thiserror::Error;

/// Errors surfaced by the engine
///
/// Only `InvalidPayload` aborts a batch. `Parse` is raised per sample and
/// contained by the decoder.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
