//! Integration tests for the rollout scheduler and plan gate.
//!
//! These tests drive runs through the public API with scripted work units.

use async_trait::async_trait;

use adaptive_rollout::{
    may_generate, CancelSignal, Domain, EnvSnapshot, ObjectiveStep, Phase, PhaseSignal,
    PlanResponse, PlanService, RolloutSettings, RunScheduler, StepFailure, Tier, WorkUnit,
};

/// Work unit that fulfills objectives on demand and finishes SR immediately.
struct Fixed {
    fulfill: bool,
}

#[async_trait]
impl WorkUnit for Fixed {
    async fn objective(&mut self, _domain: &Domain) -> Result<ObjectiveStep, StepFailure> {
        Ok(if self.fulfill {
            ObjectiveStep::Fulfilled
        } else {
            ObjectiveStep::Unfulfilled
        })
    }

    async fn refine(&mut self, _domain: &Domain) -> Result<PhaseSignal, StepFailure> {
        Ok(PhaseSignal::Finished)
    }

    async fn explore(&mut self, _domain: &Domain) -> Result<PhaseSignal, StepFailure> {
        Ok(PhaseSignal::Finished)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn scheduler_for(pairs: &[(&str, &str)]) -> RunScheduler {
    let env = EnvSnapshot::from_pairs(pairs.iter().copied());
    RunScheduler::new(RolloutSettings::from_env(&env))
}

#[tokio::test]
async fn completed_run_with_plans_disabled_gets_disabled_status() {
    let scheduler = scheduler_for(&[("PLAN_ENABLED", "0")]);
    let config = scheduler.admit("verbal", Tier::Short);
    let result = scheduler
        .run(config, &mut Fixed { fulfill: true }, &CancelSignal::never())
        .await;
    assert!(result.completed);

    let plan_enabled = scheduler.settings().flags.plan_enabled;
    assert!(!may_generate(&result, plan_enabled));

    let service = PlanService::new(plan_enabled);
    let run_id = service.record(result).await;
    assert_eq!(
        service.request_plan(run_id).await.unwrap(),
        PlanResponse::Disabled
    );
}

#[tokio::test]
async fn completed_run_with_plans_enabled_gets_plan() {
    let scheduler = scheduler_for(&[]);
    let config = scheduler.admit("mathematical", Tier::Long);
    let result = scheduler
        .run(config, &mut Fixed { fulfill: true }, &CancelSignal::never())
        .await;
    assert_eq!(
        result.phases,
        vec![Phase::Objective, Phase::Sr, Phase::Open, Phase::Done]
    );

    let service = PlanService::new(scheduler.settings().flags.plan_enabled);
    let run_id = service.record(result).await;
    match service.request_plan(run_id).await.unwrap() {
        PlanResponse::Generated { plan } => {
            assert_eq!(plan.run_id, run_id);
            assert!((2..=4).contains(&plan.goals.len()));
        }
        other => panic!("expected a generated plan, got {:?}", other),
    }
}

#[tokio::test]
async fn capped_run_is_vetoed_even_with_plans_enabled() {
    let scheduler = scheduler_for(&[("CAP_SHORT", "3"), ("PLAN_ENABLED", "1")]);
    let config = scheduler.admit("verbal", Tier::Short);
    let result = scheduler
        .run(config, &mut Fixed { fulfill: false }, &CancelSignal::never())
        .await;
    assert_eq!(result.steps_taken, 3);
    assert!(result.capped && !result.completed);

    let service = PlanService::new(true);
    let run_id = service.record(result).await;
    assert_eq!(
        service.request_plan(run_id).await.unwrap(),
        PlanResponse::Incomplete { shortfall: 4 }
    );
}

#[tokio::test]
async fn concurrent_runs_share_only_settings() {
    let scheduler = scheduler_for(&[("CAP_LONG", "20")]);
    let mut handles = Vec::new();
    for (name, fulfill) in [("a", true), ("b", false), ("c", true)] {
        let config = scheduler.admit(name, Tier::Long);
        handles.push(tokio::spawn(async move {
            scheduler
                .run(config, &mut Fixed { fulfill }, &CancelSignal::never())
                .await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert!(results[0].completed && results[0].reached_open);
    assert!(results[1].capped && results[1].steps_taken == 20);
    assert!(results[2].completed);
    assert_ne!(results[0].run_id, results[2].run_id);
}
