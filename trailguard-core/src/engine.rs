//! The tick-driven stop engine — lifecycle state machine and per-tick
//! evaluation.
//!
//! The engine runs once per incoming quote/bar event, to completion, before
//! the next event: single-threaded, no suspension points, no background
//! tasks. Each tick it re-evaluates every open position on its symbol and
//! emits mutation commands — the intent pattern: the engine never touches
//! positions directly, the host's [`PositionMutator`] does.

use crate::candidates::{self, CandidateSource, StructureSignal};
use crate::config::StrategyConfig;
use crate::domain::{Bar, PositionId, PositionSnapshot, Quote};
use crate::error::{EngineError, MutationError};
use crate::ratchet;
use crate::trailing::TrailingBook;

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
    Stopped,
}

/// One tick's read-only view of the market and the open positions.
///
/// `bars` is the full history for the configured timeframe, oldest first;
/// the last element is the bar currently forming.
#[derive(Debug, Clone)]
pub struct TickView<'a> {
    pub bars: &'a [Bar],
    pub quote: Quote,
    pub positions: &'a [PositionSnapshot],
}

/// Mutation request addressed to one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionCommand {
    /// Move the protective stop; the target is left unchanged.
    SetStop {
        id: PositionId,
        stop: f64,
        source: CandidateSource,
    },
    /// Flatten the position immediately (exhaustion wick at a swing
    /// breakout).
    Close { id: PositionId },
}

/// Host collaborator that applies mutations to live positions.
///
/// Failures are per-position: a rejection is logged and the engine moves on
/// to the next position; the next tick retries with fresh candidates.
pub trait PositionMutator {
    /// Set the stop-loss, leaving the take-profit target unchanged.
    fn set_stop(&mut self, id: PositionId, stop: f64) -> Result<(), MutationError>;

    /// Close the position outright.
    fn close(&mut self, id: PositionId) -> Result<(), MutationError>;
}

/// The stop-ratchet engine for one instrument.
pub struct Engine {
    config: StrategyConfig,
    state: EngineState,
    trailing: TrailingBook,
}

impl Engine {
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
            trailing: TrailingBook::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Per-position trailing state (diagnostics).
    pub fn trailing(&self) -> &TrailingBook {
        &self.trailing
    }

    /// Transition to Running and log the configured banner.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.state == EngineState::Running {
            return Err(EngineError::AlreadyRunning);
        }
        self.trailing.clear();
        self.state = EngineState::Running;
        tracing::info!(
            "{} ({} {})",
            self.config.message,
            self.config.symbol,
            self.config.timeframe
        );
        Ok(())
    }

    /// Transition to Stopped and discard all per-position state.
    pub fn stop(&mut self) {
        self.state = EngineState::Stopped;
        self.trailing.clear();
    }

    /// Evaluate one tick and return the mutation commands without applying
    /// them. Pure with respect to the host: only the per-position trailing
    /// state advances.
    pub fn evaluate(&mut self, tick: &TickView<'_>) -> Result<Vec<PositionCommand>, EngineError> {
        if self.state != EngineState::Running {
            return Err(EngineError::NotRunning);
        }

        self.trailing.retain_open(tick.positions);

        let mut commands = Vec::new();
        for position in tick.positions {
            if position.symbol != self.config.symbol {
                continue;
            }
            if let Some(command) = self.evaluate_position(position, tick) {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    /// Evaluate one tick and apply the commands through the host mutator.
    /// Returns the commands that were actually applied.
    pub fn run_tick(
        &mut self,
        tick: &TickView<'_>,
        mutator: &mut dyn PositionMutator,
    ) -> Result<Vec<PositionCommand>, EngineError> {
        let commands = self.evaluate(tick)?;
        let mut applied = Vec::with_capacity(commands.len());
        for command in commands {
            match command {
                PositionCommand::SetStop { id, stop, source } => {
                    match mutator.set_stop(id, stop) {
                        Ok(()) => {
                            tracing::info!(
                                "position {id}: stop moved to {stop} ({})",
                                source.name()
                            );
                            applied.push(command);
                        }
                        Err(err) => {
                            tracing::warn!("position {id}: stop update rejected: {err}");
                        }
                    }
                }
                PositionCommand::Close { id } => match mutator.close(id) {
                    Ok(()) => {
                        tracing::info!("position {id}: closed on exhaustion at swing breakout");
                        applied.push(command);
                    }
                    Err(err) => {
                        tracing::warn!("position {id}: close rejected: {err}");
                    }
                },
            }
        }
        Ok(applied)
    }

    fn evaluate_position(
        &mut self,
        position: &PositionSnapshot,
        tick: &TickView<'_>,
    ) -> Option<PositionCommand> {
        // no meaningful previous bar yet: skip silently, retry next tick
        let [.., previous, current] = tick.bars else {
            return None;
        };

        // structure runs first: an exhaustion close bypasses the ratchet and
        // the remaining generators entirely
        let structure_signal = candidates::structure::evaluate(tick.bars, position.side);
        if structure_signal == StructureSignal::Exhausted {
            return Some(PositionCommand::Close { id: position.id });
        }

        let state = self.trailing.state_for(position);
        state.begin_bar(current.time);

        let initial = candidates::initial::candidate(previous, position.side);
        let breakout = candidates::breakout::candidate(current, previous, position.side, state);
        let mini_holder = candidates::mini_holder::candidate(current, position.side, state);
        let structure = match structure_signal {
            StructureSignal::Tighten { candidate, .. } => Some(candidate),
            _ => None,
        };
        let approaching_target = candidates::approaching_target::candidate(
            current,
            position.side,
            position.target,
            tick.quote,
        );

        // fixed fold order: breakout, structure, mini-holder, approaching-target
        let folded = [breakout, structure, mini_holder, approaching_target];
        let resolution =
            ratchet::resolve(position.side, initial, &folded, position.stop, tick.quote)?;

        Some(PositionCommand::SetStop {
            id: position.id,
            stop: resolution.stop,
            source: resolution.source,
        })
    }
}
