//! Adaptive Rollout - run-admission and phase-gating scheduler
//!
//! Drives domain-scoped improvement runs through OBJECTIVE, SR and OPEN
//! phases under per-tier step caps, enforces fixed objective minima before
//! later phases begin, and gates post-run plan generation.

pub mod caps;
pub mod config;
pub mod env;
pub mod error;
pub mod flags;
pub mod plan;
pub mod scheduler;
pub mod settings;
pub mod smoke;

pub use caps::{CapRegistry, Tier, OBJ_MIN_LONG, OBJ_MIN_SHORT};
pub use config::{validate_run, Validate, ValidationResult};
pub use env::EnvSnapshot;
pub use error::{Error, Result};
pub use flags::{FlagResolver, Flags};
pub use plan::{
    may_generate, FocusPlanGenerator, ImprovementPlan, PlanDecision, PlanGenerator, PlanResponse,
    PlanService,
};
pub use scheduler::{
    cancel_pair, CancelHandle, CancelSignal, Domain, ObjectiveStep, Phase, PhaseSignal, RunConfig,
    RunId, RunOutcome, RunResult, RunScheduler, StepFailure, WorkUnit,
};
pub use settings::RolloutSettings;
pub use smoke::{run_smoke, SmokeReport, SummaryLine, SyntheticWork};
