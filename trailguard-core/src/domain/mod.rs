//! Domain types: bars, quotes, position snapshots, lifecycle phases.

pub mod bar;
pub mod position;
pub mod quote;

pub use bar::Bar;
pub use position::{EntryPhase, PositionId, PositionSnapshot, Side};
pub use quote::Quote;
