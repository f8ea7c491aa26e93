//! The work-unit collaborator seam.
//!
//! The scheduler does not know what a step does; it only observes whether
//! an objective was fulfilled, whether a phase signalled its own end, and
//! whether the unit failed.

use async_trait::async_trait;
use thiserror::Error;

use super::config::Domain;

/// Outcome of one OBJECTIVE step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveStep {
    /// The unit fulfilled an objective.
    Fulfilled,
    /// The unit ran but fulfilled nothing.
    Unfulfilled,
}

/// Signal returned by SR and OPEN steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSignal {
    /// Keep going.
    Continue,
    /// The phase's own termination condition fired.
    Finished,
}

/// A single work unit failed.
///
/// Absorbed by the scheduler: the step counts toward the cap and makes no
/// progress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("step failed: {0}")]
pub struct StepFailure(pub String);

impl StepFailure {
    /// Creates a failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Executes the work behind each scheduler step.
#[async_trait]
pub trait WorkUnit: Send {
    /// Runs one unit of objective-fulfilling work.
    async fn objective(&mut self, domain: &Domain) -> Result<ObjectiveStep, StepFailure>;

    /// Runs one refinement step.
    async fn refine(&mut self, domain: &Domain) -> Result<PhaseSignal, StepFailure>;

    /// Runs one open-ended exploration step.
    async fn explore(&mut self, domain: &Domain) -> Result<PhaseSignal, StepFailure>;

    /// Returns the name of this work unit.
    fn name(&self) -> &str;
}
