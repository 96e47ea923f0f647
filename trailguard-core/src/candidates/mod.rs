//! Stop candidate generators — independent heuristics, one file each.
//!
//! Each generator inspects the current bar state and the position's trailing
//! state and produces at most one candidate stop price per tick. Candidates
//! are transient: the [ratchet resolver](crate::ratchet) folds them into a
//! single tightening decision and discards them.
//!
//! ## Concrete generators
//!
//! - [`initial`] — previous bar's opposite extreme (the fallback baseline)
//! - [`breakout`] — first-bars-after-entry breakout tightening
//! - [`mini_holder`] — running-extreme trail, gated on trend candles
//! - [`approaching_target`] — defensive tightening near the take-profit
//! - [`structure`] — swing-level breakout tightening and exhaustion close

pub mod approaching_target;
pub mod breakout;
pub mod initial;
pub mod mini_holder;
pub mod structure;

pub use structure::StructureSignal;

use serde::{Deserialize, Serialize};

/// Origin of a candidate stop price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateSource {
    Initial,
    Breakout,
    Structure,
    MiniHolder,
    ApproachingTarget,
}

impl CandidateSource {
    /// Human-readable name (for logging).
    pub fn name(&self) -> &'static str {
        match self {
            CandidateSource::Initial => "initial",
            CandidateSource::Breakout => "breakout",
            CandidateSource::Structure => "structure",
            CandidateSource::MiniHolder => "mini_holder",
            CandidateSource::ApproachingTarget => "approaching_target",
        }
    }
}

/// A candidate stop price tagged with the heuristic that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCandidate {
    pub price: f64,
    pub source: CandidateSource,
}

impl StopCandidate {
    pub fn new(price: f64, source: CandidateSource) -> Self {
        Self { price, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_names() {
        assert_eq!(CandidateSource::MiniHolder.name(), "mini_holder");
        assert_eq!(CandidateSource::Initial.name(), "initial");
    }

    #[test]
    fn source_serialization_roundtrip() {
        let source = CandidateSource::ApproachingTarget;
        let json = serde_json::to_string(&source).unwrap();
        let deser: CandidateSource = serde_json::from_str(&json).unwrap();
        assert_eq!(source, deser);
    }
}
