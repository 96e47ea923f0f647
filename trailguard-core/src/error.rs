//! Structured error types for the engine and the host boundary.

use crate::domain::PositionId;
use thiserror::Error;

/// Engine lifecycle errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine is not running (call start first)")]
    NotRunning,

    #[error("engine is already running")]
    AlreadyRunning,
}

/// Errors reported by the host when applying a position mutation.
///
/// These are per-position and non-fatal: the remaining positions of the tick
/// still run, and the next tick naturally retries with fresh candidates.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The host declined the mutation (price already crossed, position closed
    /// by another path, broker-side constraint).
    #[error("mutation rejected by host: {0}")]
    Rejected(String),

    #[error("unknown position: {0}")]
    UnknownPosition(PositionId),
}
