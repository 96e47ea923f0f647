//! TrailGuard Core — stop-ratchet engine for open trading positions.
//!
//! This crate contains the heart of the stop manager:
//! - Domain types (bars, quotes, position snapshots, lifecycle phases)
//! - Swing structure detection over the bar history
//! - Four stop candidate generators plus the approaching-target rule
//! - The ratchet resolver (stops may tighten, never loosen)
//! - Per-position trailing state keyed by position identity
//! - The tick-driven engine with its lifecycle state machine and the
//!   injected host collaborator boundary

pub mod candidates;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ratchet;
pub mod structure;
pub mod trailing;
