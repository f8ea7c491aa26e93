//! Mutable per-run state, owned by the step loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of a run. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Fulfilling the tier's objective minimum.
    Objective,
    /// Refinement after the minimum is met.
    Sr,
    /// Open-ended exploration (LONG tier only).
    Open,
    /// Terminal.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Objective => "objective",
            Phase::Sr => "sr",
            Phase::Open => "open",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Counters for a run in progress. Both counters only increase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    steps_taken: u32,
    objectives_fulfilled: u32,
    phase: Phase,
    history: Vec<Phase>,
}

impl RunState {
    /// Creates state for a run entering OBJECTIVE.
    pub fn new() -> Self {
        Self {
            steps_taken: 0,
            objectives_fulfilled: 0,
            phase: Phase::Objective,
            history: vec![Phase::Objective],
        }
    }

    /// Returns steps consumed so far.
    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Returns objectives fulfilled so far.
    pub fn objectives_fulfilled(&self) -> u32 {
        self.objectives_fulfilled
    }

    /// Returns the active phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns every phase entered, in order.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Records one step of work.
    pub fn record_step(&mut self) {
        self.steps_taken += 1;
    }

    /// Records a fulfilled objective.
    pub fn record_objective(&mut self) {
        self.objectives_fulfilled += 1;
    }

    /// Moves to `next`. Leaving DONE is not possible.
    pub fn enter(&mut self, next: Phase) {
        if self.phase == Phase::Done || self.phase == next {
            return;
        }
        self.phase = next;
        self.history.push(next);
    }

    /// Consumes the state, returning its phase history.
    pub fn into_history(self) -> Vec<Phase> {
        self.history
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
