//! Breakout stop — armed only while the position is in its entry phase.
//!
//! When the current bar pushes past the previous bar's extreme in the
//! position's favor, the stop tightens to the breakout candle's own opposite
//! extreme (current low for Long, current high for Short). The fire is
//! recorded on the trailing state; the entry phase then lapses when the next
//! bar begins, so repeated quote ticks within the breakout bar keep the
//! candidate alive (a host-rejected mutation is retried) without re-arming
//! it on later bars.

use crate::candidates::{CandidateSource, StopCandidate};
use crate::domain::{Bar, EntryPhase, Side};
use crate::trailing::TrailingState;

pub fn candidate(
    current: &Bar,
    previous: &Bar,
    side: Side,
    state: &mut TrailingState,
) -> Option<StopCandidate> {
    if state.phase != EntryPhase::JustEntered {
        return None;
    }
    let broke_out = match side {
        Side::Long => current.high > previous.high,
        Side::Short => current.low < previous.low,
    };
    if !broke_out {
        return None;
    }
    state.record_breakout(current.time);
    let price = match side {
        Side::Long => current.low,
        Side::Short => current.high,
    };
    Some(StopCandidate::new(price, CandidateSource::Breakout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn bar_time(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn make_bar_at(minute: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time: bar_time(minute),
            open,
            high,
            low,
            close,
        }
    }

    fn make_bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        make_bar_at(5, open, high, low, close)
    }

    #[test]
    fn long_breakout_uses_current_low() {
        let previous = make_bar_at(0, 11.0, 14.0, 10.0, 13.0);
        let current = make_bar(13.5, 15.0, 13.0, 14.8);
        let mut state = TrailingState::new(EntryPhase::JustEntered);

        let c = candidate(&current, &previous, Side::Long, &mut state).unwrap();
        assert_eq!(c.price, 13.0);
        assert_eq!(c.source, CandidateSource::Breakout);
    }

    #[test]
    fn short_breakout_uses_current_high() {
        let previous = make_bar_at(0, 13.0, 14.0, 10.0, 11.0);
        let current = make_bar(10.5, 11.0, 9.0, 9.2);
        let mut state = TrailingState::new(EntryPhase::JustEntered);

        let c = candidate(&current, &previous, Side::Short, &mut state).unwrap();
        assert_eq!(c.price, 11.0);
    }

    #[test]
    fn repeated_ticks_within_the_breakout_bar_keep_firing() {
        let previous = make_bar_at(0, 11.0, 14.0, 10.0, 13.0);
        let current = make_bar(13.5, 15.0, 13.0, 14.8);
        let mut state = TrailingState::new(EntryPhase::JustEntered);

        assert!(candidate(&current, &previous, Side::Long, &mut state).is_some());
        state.begin_bar(current.time);
        assert!(candidate(&current, &previous, Side::Long, &mut state).is_some());
    }

    #[test]
    fn phase_lapses_when_the_next_bar_begins() {
        let previous = make_bar_at(0, 11.0, 14.0, 10.0, 13.0);
        let current = make_bar(13.5, 15.0, 13.0, 14.8);
        let mut state = TrailingState::new(EntryPhase::JustEntered);
        candidate(&current, &previous, Side::Long, &mut state).unwrap();

        let next = make_bar_at(10, 14.8, 16.0, 14.5, 15.8);
        state.begin_bar(next.time);
        assert_eq!(state.phase, EntryPhase::Trending);
        assert!(candidate(&next, &current, Side::Long, &mut state).is_none());
    }

    #[test]
    fn no_breakout_keeps_phase_armed() {
        let previous = make_bar_at(0, 11.0, 14.0, 10.0, 13.0);
        let current = make_bar(13.0, 13.8, 12.5, 13.2); // inside bar
        let mut state = TrailingState::new(EntryPhase::JustEntered);

        assert!(candidate(&current, &previous, Side::Long, &mut state).is_none());
        state.begin_bar(bar_time(10));
        assert_eq!(state.phase, EntryPhase::JustEntered);
    }

    #[test]
    fn silent_outside_entry_phase() {
        let previous = make_bar_at(0, 11.0, 14.0, 10.0, 13.0);
        let current = make_bar(13.5, 15.0, 13.0, 14.8);
        let mut state = TrailingState::new(EntryPhase::Trending);

        assert!(candidate(&current, &previous, Side::Long, &mut state).is_none());
    }

    #[test]
    fn equal_extreme_is_not_a_breakout() {
        let previous = make_bar_at(0, 11.0, 14.0, 10.0, 13.0);
        let current = make_bar(13.0, 14.0, 12.0, 13.5); // matches, does not exceed
        let mut state = TrailingState::new(EntryPhase::JustEntered);

        assert!(candidate(&current, &previous, Side::Long, &mut state).is_none());
    }
}
