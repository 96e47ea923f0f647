//! Approaching-target stop — defensive tightening near the take-profit.
//!
//! Once the quote is within one candle's range of the target, a single
//! adverse candle could tag the target zone and reverse; the stop moves to
//! the current bar's opposite extreme to protect the open profit.

use crate::candidates::{CandidateSource, StopCandidate};
use crate::domain::{Bar, Quote, Side};

/// Skipped entirely when the position has no target set.
pub fn candidate(
    current: &Bar,
    side: Side,
    target: Option<f64>,
    quote: Quote,
) -> Option<StopCandidate> {
    let target = target?;
    let candle_length = current.range();
    match side {
        Side::Long => {
            let distance = target - quote.bid;
            (distance <= candle_length)
                .then(|| StopCandidate::new(current.low, CandidateSource::ApproachingTarget))
        }
        Side::Short => {
            let distance = quote.ask - target;
            (distance <= candle_length)
                .then(|| StopCandidate::new(current.high, CandidateSource::ApproachingTarget))
        }
    }
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

    #[test]
    fn no_target_no_candidate() {
        let bar = make_bar(19.3, 19.7, 19.2, 19.6);
        let quote = Quote::new(19.6, 19.62);
        assert!(candidate(&bar, Side::Long, None, quote).is_none());
    }

    #[test]
    fn long_fires_within_one_candle_of_target() {
        // distance to target 0.4 <= candle length 0.5
        let bar = make_bar(19.3, 19.7, 19.2, 19.6);
        let quote = Quote::new(19.6, 19.62);
        let c = candidate(&bar, Side::Long, Some(20.0), quote).unwrap();
        assert_eq!(c.price, 19.2);
        assert_eq!(c.source, CandidateSource::ApproachingTarget);
    }

    #[test]
    fn long_silent_when_target_is_far() {
        let bar = make_bar(19.3, 19.7, 19.2, 19.6);
        let quote = Quote::new(19.6, 19.62);
        assert!(candidate(&bar, Side::Long, Some(21.0), quote).is_none());
    }

    #[test]
    fn short_mirrors_with_ask_and_high() {
        // ask 10.42 - target 10.0 = 0.42 <= range 0.5
        let bar = make_bar(10.5, 10.7, 10.2, 10.3);
        let quote = Quote::new(10.4, 10.42);
        let c = candidate(&bar, Side::Short, Some(10.0), quote).unwrap();
        assert_eq!(c.price, 10.7);
    }

    #[test]
    fn distance_equal_to_candle_length_fires() {
        let bar = make_bar(19.3, 19.7, 19.2, 19.6);
        let quote = Quote::new(19.5, 19.52);
        // distance exactly 0.5 == candle length
        let c = candidate(&bar, Side::Long, Some(20.0), quote);
        assert!(c.is_some());
    }
}
