//! Position snapshots and the entry lifecycle phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position side (semantic representation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

/// Host-assigned position identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl From<u64> for PositionId {
    fn from(id: u64) -> Self {
        PositionId(id)
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Marker the host writes into a freshly opened position's tag.
pub const JUST_ENTERED_TAG: &str = "first-bar-since-entry";

/// Marker for a position parked until the next trend-confirming candle.
pub const AWAITING_REVERSAL_TAG: &str = "awaiting-reversal";

/// Lifecycle phase of a managed position.
///
/// The host communicates the phase at entry through a free-text tag; it is
/// parsed exactly once, at first observation, and transitioned explicitly by
/// the engine afterwards:
/// - `JustEntered` -> `Trending` when the breakout stop fires (one-shot)
/// - `AwaitingReversal` -> `Trending` on the first trend-confirming candle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryPhase {
    /// Still inside the first bar(s) after entry; breakout stop is armed.
    JustEntered,
    /// Normal trailing regime.
    Trending,
    /// Mini-holder emission suppressed until a trend candle appears.
    AwaitingReversal,
}

impl EntryPhase {
    /// Parse the host's entry tag at the engine boundary.
    ///
    /// Unrecognized tags (including empty) mean the position is past its
    /// entry phase and trails normally.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            JUST_ENTERED_TAG => EntryPhase::JustEntered,
            AWAITING_REVERSAL_TAG => EntryPhase::AwaitingReversal,
            _ => EntryPhase::Trending,
        }
    }
}

/// Read-only view of one open position as reported by the host for one tick.
///
/// The core never creates or destroys positions; it only addresses mutation
/// requests to them by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub id: PositionId,
    pub symbol: String,
    pub side: Side,
    /// Current protective stop, if one is set.
    pub stop: Option<f64>,
    /// Current take-profit target, if one is set.
    pub target: Option<f64>,
    /// Free-text lifecycle tag written by the host at entry.
    pub entry_tag: String,
}

impl PositionSnapshot {
    pub fn is_long(&self) -> bool {
        self.side == Side::Long
    }

    pub fn is_short(&self) -> bool {
        self.side == Side::Short
    }
}
