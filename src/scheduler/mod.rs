//! Run scheduler: drives a single run through its phases.
//!
//! OBJECTIVE → SR → OPEN → DONE, bounded by a step cap and interruptible
//! between steps by a cancel signal.

pub mod cancel;
pub mod config;
pub mod result;
pub mod runner;
pub mod state;
pub mod work;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use config::{Domain, RunConfig, RunId};
pub use result::{RunOutcome, RunResult};
pub use runner::RunScheduler;
pub use state::{Phase, RunState};
pub use work::{ObjectiveStep, PhaseSignal, StepFailure, WorkUnit};
