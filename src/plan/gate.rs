//! Plan gating.

use serde::{Deserialize, Serialize};

use crate::scheduler::RunResult;

/// Why a plan may or may not be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanDecision {
    /// Plan generation is permitted.
    Generate,
    /// `PLAN_ENABLED` is off.
    Disabled,
    /// The run did not complete. Always a veto.
    Incomplete,
}

/// Decides plan generation for a finished run. Disabled is reported first.
pub fn decide(result: &RunResult, plan_enabled: bool) -> PlanDecision {
    if !plan_enabled {
        PlanDecision::Disabled
    } else if !result.completed {
        PlanDecision::Incomplete
    } else {
        PlanDecision::Generate
    }
}

/// Returns true iff plans are enabled and the run completed.
pub fn may_generate(result: &RunResult, plan_enabled: bool) -> bool {
    decide(result, plan_enabled) == PlanDecision::Generate
}
