//! Top-of-book quote snapshot.

use serde::{Deserialize, Serialize};

/// Current bid/ask pair for the traded instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Both sides positive and the ask at or above the bid.
    pub fn is_sane(&self) -> bool {
        self.bid > 0.0 && self.ask >= self.bid
    }
}
