//! Per-position trailing state — mini-holder extremes and lifecycle phase.
//!
//! Every open position owns exactly one [`TrailingState`]. A single state
//! shared across positions corrupts the mini-holder stop, so the book is an
//! arena keyed by position id: entries are created on first observation of a
//! position and discarded once the host stops reporting it.
//!
//! Phase transitions are keyed to bar identity (the bar's open time), not to
//! evaluation calls: a live host delivers many quote ticks per bar, and
//! re-evaluating the same bar must not advance the lifecycle. A breakout
//! therefore stays armed for the remainder of its bar (so a rejected
//! mutation is retried), and the awaiting-reversal hold covers the whole
//! clearing bar.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::{Bar, EntryPhase, PositionId, PositionSnapshot};

/// Running extremes and lifecycle phase for a single position.
///
/// Invariant: `extreme_low` only ever decreases and `extreme_high` only ever
/// increases across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingState {
    /// Lowest low observed since the position was first seen.
    pub extreme_low: f64,
    /// Highest high observed since the position was first seen.
    pub extreme_high: f64,
    pub phase: EntryPhase,
    breakout_fired_at: Option<NaiveDateTime>,
    reversal_cleared_at: Option<NaiveDateTime>,
}

impl TrailingState {
    pub fn new(phase: EntryPhase) -> Self {
        Self {
            extreme_low: f64::INFINITY,
            extreme_high: f64::NEG_INFINITY,
            phase,
            breakout_fired_at: None,
            reversal_cleared_at: None,
        }
    }

    /// Fold the current bar into the running extremes.
    pub fn observe(&mut self, bar: &Bar) {
        if bar.low < self.extreme_low {
            self.extreme_low = bar.low;
        }
        if bar.high > self.extreme_high {
            self.extreme_high = bar.high;
        }
    }

    /// Advance bar-granular phase transitions. Called once per evaluation,
    /// before the generators run.
    pub fn begin_bar(&mut self, bar_time: NaiveDateTime) {
        match self.phase {
            EntryPhase::JustEntered => {
                if self.breakout_fired_at.is_some_and(|t| t != bar_time) {
                    self.phase = EntryPhase::Trending;
                }
            }
            EntryPhase::AwaitingReversal => {
                if self.reversal_cleared_at.is_some_and(|t| t != bar_time) {
                    self.phase = EntryPhase::Trending;
                }
            }
            EntryPhase::Trending => {}
        }
    }

    /// Note that the breakout stop fired on this bar; the entry phase ends
    /// when the next bar begins.
    pub fn record_breakout(&mut self, bar_time: NaiveDateTime) {
        self.breakout_fired_at = Some(bar_time);
    }

    /// Note that a trend-confirming candle cleared the reversal hold; the
    /// hold lapses when the next bar begins.
    pub fn record_reversal_clear(&mut self, bar_time: NaiveDateTime) {
        self.reversal_cleared_at = Some(bar_time);
    }
}

/// Arena of trailing state keyed by position identity.
#[derive(Debug, Default)]
pub struct TrailingBook {
    states: HashMap<PositionId, TrailingState>,
}

impl TrailingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the state for a position, creating it on first observation with
    /// the phase parsed from the host's entry tag.
    pub fn state_for(&mut self, snapshot: &PositionSnapshot) -> &mut TrailingState {
        self.states
            .entry(snapshot.id)
            .or_insert_with(|| TrailingState::new(EntryPhase::from_tag(&snapshot.entry_tag)))
    }

    /// Drop state for positions the host no longer reports (closed).
    pub fn retain_open(&mut self, open: &[PositionSnapshot]) {
        self.states.retain(|id, _| open.iter().any(|p| p.id == *id));
    }

    pub fn get(&self, id: PositionId) -> Option<&TrailingState> {
        self.states.get(&id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
