//! Structural stop — tighten on breakouts past swing levels, or close
//! outright when the breakout candle shows an exhaustion wick.
//!
//! For a Long position every swing high strictly below the current bar's high
//! qualifies; the candidate is always the current bar's low. The forward scan
//! keeps the LAST qualifying index (later overwrite) — an arbitrary but
//! deterministic tie-break preserved for reproducibility. Shorts mirror
//! against swing lows.

use crate::candidates::{CandidateSource, StopCandidate};
use crate::domain::{Bar, Side};
use crate::structure::{swing_highs, swing_lows};

/// Fraction of a bar's range the rejection wick must occupy to signal
/// exhaustion at a swing breakout.
pub const EXHAUSTION_WICK_RATIO: f64 = 0.40;

/// Outcome of the structural evaluation for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StructureSignal {
    /// No qualifying swing level this tick.
    None,
    /// Breakout past at least one swing level; tighten to the breakout bar's
    /// opposite extreme.
    Tighten {
        candidate: StopCandidate,
        /// Last qualifying swing index in the forward scan.
        swing_index: usize,
    },
    /// Breakout rejected by an exhaustion wick; close the position outright,
    /// skipping the stop ratchet for this tick.
    Exhausted,
}

pub fn evaluate(bars: &[Bar], side: Side) -> StructureSignal {
    let Some(current) = bars.last() else {
        return StructureSignal::None;
    };

    let last_qualifying = match side {
        Side::Long => swing_highs(bars)
            .filter(|&i| current.high > bars[i].high)
            .last(),
        Side::Short => swing_lows(bars)
            .filter(|&i| current.low < bars[i].low)
            .last(),
    };
    let Some(swing_index) = last_qualifying else {
        return StructureSignal::None;
    };

    if exhaustion_wick(current, side) {
        return StructureSignal::Exhausted;
    }

    let price = match side {
        Side::Long => current.low,
        Side::Short => current.high,
    };
    StructureSignal::Tighten {
        candidate: StopCandidate::new(price, CandidateSource::Structure),
        swing_index,
    }
}

/// Rejection wick test: upper wick for Long breakouts, lower for Short.
fn exhaustion_wick(bar: &Bar, side: Side) -> bool {
    let range = bar.range();
    if range <= 0.0 {
        return false;
    }
    let wick = match side {
        Side::Long => bar.upper_wick(),
        Side::Short => bar.lower_wick(),
    };
    wick / range >= EXHAUSTION_WICK_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open,
            high,
            low,
            close,
        }
    }

    fn flat_bar(high: f64, low: f64) -> Bar {
        make_bar((high + low) / 2.0, high, low, (high + low) / 2.0)
    }

    /// Swing high of 12.0 at index 2, then a breakout bar.
    fn history_with_breakout(breakout: Bar) -> Vec<Bar> {
        vec![
            flat_bar(10.0, 9.0),
            flat_bar(11.0, 10.0),
            flat_bar(12.0, 11.0),
            flat_bar(11.0, 10.0),
            flat_bar(10.5, 9.5),
            breakout,
        ]
    }

    #[test]
    fn long_breakout_tightens_to_current_low() {
        // small upper wick: close near the high
        let bars = history_with_breakout(make_bar(11.2, 13.0, 11.0, 12.9));
        match evaluate(&bars, Side::Long) {
            StructureSignal::Tighten {
                candidate,
                swing_index,
            } => {
                assert_eq!(candidate.price, 11.0);
                assert_eq!(candidate.source, CandidateSource::Structure);
                assert_eq!(swing_index, 2);
            }
            other => panic!("expected Tighten, got {other:?}"),
        }
    }

    #[test]
    fn no_signal_below_swing_level() {
        let bars = history_with_breakout(make_bar(11.0, 11.8, 10.8, 11.5));
        assert_eq!(evaluate(&bars, Side::Long), StructureSignal::None);
    }

    #[test]
    fn exhaustion_wick_closes_instead_of_tightening() {
        // range 2.0, upper wick 13.0 - 12.1 = 0.9 -> 45%
        let bars = history_with_breakout(make_bar(11.2, 13.0, 11.0, 12.1));
        assert_eq!(evaluate(&bars, Side::Long), StructureSignal::Exhausted);
    }

    #[test]
    fn wick_below_threshold_still_tightens() {
        // range 2.0, upper wick 13.0 - 12.3 = 0.7 -> 35%
        let bars = history_with_breakout(make_bar(11.2, 13.0, 11.0, 12.3));
        assert!(matches!(
            evaluate(&bars, Side::Long),
            StructureSignal::Tighten { .. }
        ));
    }

    #[test]
    fn last_qualifying_swing_wins() {
        // two swing highs (indices 2 and 6), both below the breakout high
        let bars = vec![
            flat_bar(10.0, 9.0),
            flat_bar(11.0, 10.0),
            flat_bar(12.0, 11.0),
            flat_bar(11.0, 10.0),
            flat_bar(10.5, 9.5),
            flat_bar(11.0, 10.0),
            flat_bar(12.5, 11.5),
            flat_bar(11.0, 10.0),
            flat_bar(10.5, 9.5),
            make_bar(11.2, 13.0, 11.0, 12.9),
        ];
        match evaluate(&bars, Side::Long) {
            StructureSignal::Tighten { swing_index, .. } => assert_eq!(swing_index, 6),
            other => panic!("expected Tighten, got {other:?}"),
        }
    }

    #[test]
    fn short_mirrors_against_swing_lows() {
        let bars = vec![
            flat_bar(10.0, 9.0),
            flat_bar(9.0, 8.0),
            flat_bar(8.0, 7.0),
            flat_bar(9.0, 8.0),
            flat_bar(9.5, 8.5),
            // breakdown below the swing low at index 2, small lower wick
            make_bar(7.8, 8.0, 6.5, 6.6),
        ];
        match evaluate(&bars, Side::Short) {
            StructureSignal::Tighten { candidate, .. } => assert_eq!(candidate.price, 8.0),
            other => panic!("expected Tighten, got {other:?}"),
        }
    }

    #[test]
    fn short_history_produces_nothing() {
        let bars = vec![flat_bar(10.0, 9.0), make_bar(10.0, 12.0, 9.5, 11.8)];
        assert_eq!(evaluate(&bars, Side::Long), StructureSignal::None);
        assert_eq!(evaluate(&[], Side::Long), StructureSignal::None);
    }
}
