//! Terminal run snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::caps::Tier;

use super::config::{Domain, RunId};
use super::state::Phase;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// The objective minimum was met. The run may still have used its whole cap.
    Completed,
    /// The cap ran out before the objective minimum was met.
    Capped,
    /// Cancelled between steps.
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Capped => "capped",
            RunOutcome::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of a finished run.
///
/// `completed` and `capped` are both true only when the cap ran out during
/// SR or OPEN, after the objective minimum was already met. A cancelled run
/// has both false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Identifier assigned at admission.
    pub run_id: RunId,
    /// Domain the run improved.
    pub domain: Domain,
    /// Tier the run was admitted under.
    pub tier: Tier,
    /// Steps consumed, including failed ones.
    pub steps_taken: u32,
    /// Step cap in force.
    pub step_cap: u32,
    /// Objectives fulfilled.
    pub objectives_fulfilled: u32,
    /// Objective minimum in force.
    pub objective_min: u32,
    /// Objective minimum met and the run finished.
    pub completed: bool,
    /// The step cap forced the run terminal.
    pub capped: bool,
    /// The run entered OPEN.
    pub reached_open: bool,
    /// Work units that failed and were absorbed.
    pub failed_steps: u32,
    /// Every phase entered, in order.
    pub phases: Vec<Phase>,
}

impl RunResult {
    /// Classifies the terminal outcome.
    pub fn outcome(&self) -> RunOutcome {
        if self.completed {
            RunOutcome::Completed
        } else if self.capped {
            RunOutcome::Capped
        } else {
            RunOutcome::Cancelled
        }
    }

    /// Returns objectives still missing to reach the minimum.
    pub fn shortfall(&self) -> u32 {
        self.objective_min.saturating_sub(self.objectives_fulfilled)
    }

    /// Returns unused steps.
    pub fn steps_remaining(&self) -> u32 {
        self.step_cap.saturating_sub(self.steps_taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(completed: bool, capped: bool) -> RunResult {
        RunResult {
            run_id: RunId::new(),
            domain: Domain::from("verbal"),
            tier: Tier::Short,
            steps_taken: 10,
            step_cap: 12,
            objectives_fulfilled: 3,
            objective_min: 4,
            completed,
            capped,
            reached_open: false,
            failed_steps: 0,
            phases: vec![Phase::Objective, Phase::Done],
        }
    }

    #[test]
    fn outcome_distinguishes_capped_from_cancelled() {
        assert_eq!(result(false, true).outcome(), RunOutcome::Capped);
        assert_eq!(result(false, false).outcome(), RunOutcome::Cancelled);
        assert_eq!(result(true, false).outcome(), RunOutcome::Completed);
        assert_eq!(result(true, true).outcome(), RunOutcome::Completed);
    }

    #[test]
    fn shortfall_and_remaining_saturate() {
        let mut r = result(false, true);
        assert_eq!(r.shortfall(), 1);
        assert_eq!(r.steps_remaining(), 2);
        r.objectives_fulfilled = 9;
        r.steps_taken = 12;
        assert_eq!(r.shortfall(), 0);
        assert_eq!(r.steps_remaining(), 0);
    }

    #[test]
    fn result_serializes_phases_lowercase() {
        let json = serde_json::to_string(&result(false, true)).unwrap();
        assert!(json.contains("\"phases\":[\"objective\",\"done\"]"));
        assert!(json.contains("\"tier\":\"short\""));
    }
}
