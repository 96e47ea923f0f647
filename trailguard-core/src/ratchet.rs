//! Ratchet resolution — fold candidate stops into one tightening decision.
//!
//! **Core rule:** stops may tighten, never loosen.
//!
//! The fold starts from the initial stop and replaces it with each candidate
//! that is strictly tighter, in a fixed order. The folded value must then
//! clear two guards before it may be applied:
//! 1. strictly tighter than the position's live stop (never loosen, and an
//!    unchanged tick re-derives a value equal to the live stop, so the
//!    re-evaluation is idempotent);
//! 2. on the safe side of the market (below bid for Long, above ask for
//!    Short), so a stop is never ratcheted through the spread into an
//!    immediately-triggerable state.

use crate::candidates::{CandidateSource, StopCandidate};
use crate::domain::{Quote, Side};

/// The stop chosen for one position on one tick, tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub stop: f64,
    pub source: CandidateSource,
}

/// True iff `a` is strictly tighter than `b` for the given side.
pub fn is_tighter(side: Side, a: f64, b: f64) -> bool {
    match side {
        Side::Long => a > b,
        Side::Short => a < b,
    }
}

/// Fold `candidates` over `initial` in slice order, then admit the result
/// through the ratchet and market guards. Returns `None` when nothing may be
/// applied this tick.
pub fn resolve(
    side: Side,
    initial: StopCandidate,
    candidates: &[Option<StopCandidate>],
    live_stop: Option<f64>,
    quote: Quote,
) -> Option<Resolution> {
    let mut tightest = initial;
    for candidate in candidates.iter().flatten() {
        if is_tighter(side, candidate.price, tightest.price) {
            tightest = *candidate;
        }
    }

    if let Some(stop) = live_stop {
        if !is_tighter(side, tightest.price, stop) {
            return None;
        }
    }

    let clears_market = match side {
        Side::Long => tightest.price < quote.bid,
        Side::Short => tightest.price > quote.ask,
    };
    if !clears_market {
        return None;
    }

    Some(Resolution {
        stop: tightest.price,
        source: tightest.source,
    })
}
