//! Mini-holder trailing stop — running extreme since first observation,
//! emitted only on trend-confirming candles.
//!
//! The extreme updates on every tick regardless of candle direction; emission
//! waits for a candle that confirms the trend (bullish for Long, bearish for
//! Short) so the stop does not chase counter-trend noise. While the position
//! is awaiting a reversal, the first trend candle only clears the hold —
//! emission resumes on the next trend candle of a later bar.

use crate::candidates::{CandidateSource, StopCandidate};
use crate::domain::{Bar, EntryPhase, Side};
use crate::trailing::TrailingState;

pub fn candidate(current: &Bar, side: Side, state: &mut TrailingState) -> Option<StopCandidate> {
    state.observe(current);

    let trend_candle = match side {
        Side::Long => current.is_bullish(),
        Side::Short => current.is_bearish(),
    };
    if !trend_candle {
        return None;
    }

    if state.phase == EntryPhase::AwaitingReversal {
        state.record_reversal_clear(current.time);
        return None;
    }

    let price = match side {
        Side::Long => state.extreme_low,
        Side::Short => state.extreme_high,
    };
    Some(StopCandidate::new(price, CandidateSource::MiniHolder))
}
