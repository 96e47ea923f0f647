//! Initial stop — the previous bar's opposite extreme.
//!
//! This is the floor (Long) / ceiling (Short) every other heuristic must beat
//! before the resolver will consider it.

use crate::candidates::{CandidateSource, StopCandidate};
use crate::domain::{Bar, Side};

/// Previous bar's low for Long, high for Short. Always produced once a
/// previous bar exists.
pub fn candidate(previous: &Bar, side: Side) -> StopCandidate {
    let price = match side {
        Side::Long => previous.low,
        Side::Short => previous.high,
    };
    StopCandidate::new(price, CandidateSource::Initial)
}
