//! Plan endpoint contract, independent of any HTTP transport.
//!
//! Finished runs are recorded under their [`RunId`]. A plan request consults
//! the gate first, then generates once and serves the cached plan on every
//! later request for the same run.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::caps::Tier;
use crate::error::{Error, Result};
use crate::scheduler::{Domain, RunId, RunResult};

use super::gate::{decide, PlanDecision};

/// Smallest number of goals a generated plan carries.
pub const PLAN_GOALS_MIN: usize = 2;

/// Largest number of goals a generated plan carries.
pub const PLAN_GOALS_MAX: usize = 4;

/// A post-run improvement artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementPlan {
    /// Run the plan was generated for.
    pub run_id: RunId,
    /// Domain of that run.
    pub domain: Domain,
    /// Tier of that run.
    pub tier: Tier,
    /// Concrete goals, in priority order.
    pub goals: Vec<String>,
}

/// Response to a plan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlanResponse {
    /// Plan generation is switched off; no plan body is produced.
    Disabled,
    /// The run did not complete.
    Incomplete {
        /// Objectives the run was short of its minimum.
        shortfall: u32,
    },
    /// A plan was generated (or served from cache).
    Generated {
        /// The plan.
        plan: ImprovementPlan,
    },
}

/// Produces plan bodies for completed runs.
pub trait PlanGenerator: Send + Sync {
    /// Generates a plan. Only called for runs the gate admitted.
    fn generate(&self, result: &RunResult) -> ImprovementPlan;
}

/// Default generator: derives goals from the run's counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusPlanGenerator;

impl PlanGenerator for FocusPlanGenerator {
    fn generate(&self, result: &RunResult) -> ImprovementPlan {
        let mut goals = vec![format!(
            "Sustain {} objectives (minimum {}) in the next {} {} run",
            result.objectives_fulfilled, result.objective_min, result.tier, result.domain
        )];

        if result.failed_steps > 0 {
            goals.push(format!(
                "Investigate {} failed work units before the next {} run",
                result.failed_steps, result.domain
            ));
        }
        if result.capped {
            goals.push(format!(
                "Finish refinement within {} steps; this run used the whole cap",
                result.step_cap
            ));
        }
        if result.tier == Tier::Long && !result.reached_open {
            goals.push(format!("Reach open exploration in {}", result.domain));
        } else if result.reached_open {
            goals.push(format!(
                "Turn open exploration findings in {} into new objectives",
                result.domain
            ));
        }
        if goals.len() < PLAN_GOALS_MIN {
            goals.push(format!("Repeat the {} run to confirm the result", result.domain));
        }
        goals.truncate(PLAN_GOALS_MAX);

        ImprovementPlan {
            run_id: result.run_id,
            domain: result.domain.clone(),
            tier: result.tier,
            goals,
        }
    }
}

#[derive(Debug)]
struct Entry {
    result: RunResult,
    plan: Option<ImprovementPlan>,
}

/// Serves plan requests keyed by run identifier.
#[derive(Clone)]
pub struct PlanService {
    plan_enabled: bool,
    generator: Arc<dyn PlanGenerator>,
    runs: Arc<Mutex<HashMap<RunId, Entry>>>,
}

impl PlanService {
    /// Creates a service using the default generator.
    pub fn new(plan_enabled: bool) -> Self {
        Self::with_generator(plan_enabled, Arc::new(FocusPlanGenerator))
    }

    /// Creates a service with a custom generator.
    pub fn with_generator(plan_enabled: bool, generator: Arc<dyn PlanGenerator>) -> Self {
        Self {
            plan_enabled,
            generator,
            runs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a finished run so plans can be requested for it.
    pub async fn record(&self, result: RunResult) -> RunId {
        let run_id = result.run_id;
        self.runs
            .lock()
            .await
            .insert(run_id, Entry { result, plan: None });
        run_id
    }

    /// Answers a plan request for a recorded run.
    pub async fn request_plan(&self, run_id: RunId) -> Result<PlanResponse> {
        let mut runs = self.runs.lock().await;
        let entry = runs.get_mut(&run_id).ok_or(Error::RunNotFound(run_id))?;

        match decide(&entry.result, self.plan_enabled) {
            PlanDecision::Disabled => {
                tracing::info!(run_id = %run_id, "plan generation disabled");
                Ok(PlanResponse::Disabled)
            }
            PlanDecision::Incomplete => {
                tracing::info!(
                    run_id = %run_id,
                    shortfall = entry.result.shortfall(),
                    "plan refused for incomplete run"
                );
                Ok(PlanResponse::Incomplete {
                    shortfall: entry.result.shortfall(),
                })
            }
            PlanDecision::Generate => {
                let plan = match &entry.plan {
                    Some(plan) => plan.clone(),
                    None => {
                        let plan = self.generator.generate(&entry.result);
                        tracing::info!(run_id = %run_id, goals = plan.goals.len(), "plan generated");
                        entry.plan = Some(plan.clone());
                        plan
                    }
                };
                Ok(PlanResponse::Generated { plan })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Phase;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn completed_long() -> RunResult {
        RunResult {
            run_id: RunId::new(),
            domain: Domain::from("mathematical"),
            tier: Tier::Long,
            steps_taken: 30,
            step_cap: 160,
            objectives_fulfilled: 9,
            objective_min: 8,
            completed: true,
            capped: false,
            reached_open: false,
            failed_steps: 2,
            phases: vec![Phase::Objective, Phase::Sr, Phase::Done],
        }
    }

    struct CountingGenerator(AtomicUsize);

    impl PlanGenerator for CountingGenerator {
        fn generate(&self, result: &RunResult) -> ImprovementPlan {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            ImprovementPlan {
                run_id: result.run_id,
                domain: result.domain.clone(),
                tier: result.tier,
                goals: vec![format!("generation {}", n)],
            }
        }
    }

    #[tokio::test]
    async fn disabled_service_reports_status_without_plan() {
        let service = PlanService::new(false);
        let run_id = service.record(completed_long()).await;

        let response = service.request_plan(run_id).await.unwrap();
        assert_eq!(response, PlanResponse::Disabled);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"disabled"}"#);
    }

    #[tokio::test]
    async fn incomplete_run_reports_shortfall() {
        let service = PlanService::new(true);
        let mut result = completed_long();
        result.completed = false;
        result.capped = true;
        result.objectives_fulfilled = 5;
        let run_id = service.record(result).await;

        let response = service.request_plan(run_id).await.unwrap();
        assert_eq!(response, PlanResponse::Incomplete { shortfall: 3 });
    }

    #[tokio::test]
    async fn repeated_requests_return_cached_plan() {
        let generator = Arc::new(CountingGenerator(AtomicUsize::new(0)));
        let service = PlanService::with_generator(true, generator.clone());
        let run_id = service.record(completed_long()).await;

        let first = service.request_plan(run_id).await.unwrap();
        let second = service.request_plan(run_id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_run_is_not_found() {
        let service = PlanService::new(true);
        let missing = RunId::new();
        let err = service.request_plan(missing).await.unwrap_err();
        assert!(matches!(err, Error::RunNotFound(id) if id == missing));
    }

    #[test]
    fn focus_generator_keeps_goal_count_in_bounds() {
        let generator = FocusPlanGenerator;

        let mut quiet = completed_long();
        quiet.tier = Tier::Short;
        quiet.failed_steps = 0;
        let plan = generator.generate(&quiet);
        assert_eq!(plan.goals.len(), PLAN_GOALS_MIN);

        let mut busy = completed_long();
        busy.capped = true;
        let plan = generator.generate(&busy);
        assert!(plan.goals.len() <= PLAN_GOALS_MAX);
        assert!(plan.goals.iter().any(|g| g.contains("failed work units")));
        assert!(plan.goals.iter().any(|g| g.contains("open exploration")));
        assert_eq!(plan.run_id, busy.run_id);
    }
}
