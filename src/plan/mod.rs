//! Post-run improvement plans.
//!
//! [`gate`] decides whether a plan may be generated at all; [`service`] is
//! the transport-free contract the plan endpoint follows.

pub mod gate;
pub mod service;

pub use gate::{decide, may_generate, PlanDecision};
pub use service::{FocusPlanGenerator, ImprovementPlan, PlanGenerator, PlanResponse, PlanService};
