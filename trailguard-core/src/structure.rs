//! Swing structure detection — local price extrema over the bar history.
//!
//! A swing high is a bar whose high strictly exceeds the highs of the two
//! bars on each side; swing lows mirror on lows. The two bars at each end of
//! the window never qualify (insufficient neighbors). The sets are derived
//! lazily and recomputed in full each tick.

use crate::domain::Bar;

/// Candles examined on each side of a potential swing point.
pub const STRUCTURE_LOOKBACK: usize = 2;

/// Shortest history that can contain a swing point.
pub const MIN_STRUCTURE_HISTORY: usize = 2 * STRUCTURE_LOOKBACK + 1;

/// True iff `i` has enough neighbors and its high strictly exceeds the highs
/// at `i-2..=i+2` (excluding itself).
pub fn is_swing_high(bars: &[Bar], i: usize) -> bool {
    if i < STRUCTURE_LOOKBACK || i + STRUCTURE_LOOKBACK >= bars.len() {
        return false;
    }
    let high = bars[i].high;
    high > bars[i - 1].high
        && high > bars[i - 2].high
        && high > bars[i + 1].high
        && high > bars[i + 2].high
}

/// Mirror of [`is_swing_high`] on lows.
pub fn is_swing_low(bars: &[Bar], i: usize) -> bool {
    if i < STRUCTURE_LOOKBACK || i + STRUCTURE_LOOKBACK >= bars.len() {
        return false;
    }
    let low = bars[i].low;
    low < bars[i - 1].low
        && low < bars[i - 2].low
        && low < bars[i + 1].low
        && low < bars[i + 2].low
}

/// Indices of all swing highs, in ascending order. Empty on short history.
pub fn swing_highs(bars: &[Bar]) -> impl Iterator<Item = usize> + '_ {
    candidate_range(bars).filter(move |&i| is_swing_high(bars, i))
}

/// Indices of all swing lows, in ascending order. Empty on short history.
pub fn swing_lows(bars: &[Bar]) -> impl Iterator<Item = usize> + '_ {
    candidate_range(bars).filter(move |&i| is_swing_low(bars, i))
}

fn candidate_range(bars: &[Bar]) -> std::ops::Range<usize> {
    STRUCTURE_LOOKBACK..bars.len().saturating_sub(STRUCTURE_LOOKBACK)
}
