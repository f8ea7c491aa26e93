//! Smoke runs and per-domain summaries.
//!
//! A smoke run admits one run per domain, drives them concurrently with a
//! synthetic work unit, and summarizes each result on a single line whose
//! fields mirror [`RunResult`].

use std::fmt;

use async_trait::async_trait;

use crate::caps::Tier;
use crate::config::validate_run;
use crate::error::Result;
use crate::scheduler::{
    CancelSignal, Domain, ObjectiveStep, PhaseSignal, RunOutcome, RunResult, RunScheduler,
    StepFailure, WorkUnit,
};

/// SR steps the synthetic work unit takes before finishing refinement.
pub const SMOKE_SR_STEPS: u32 = 2;

/// OPEN steps the synthetic work unit takes before finishing exploration.
pub const SMOKE_OPEN_STEPS: u32 = 2;

/// Work unit that always succeeds: every objective step is fulfilled and
/// SR/OPEN finish after a fixed number of steps.
#[derive(Debug, Clone)]
pub struct SyntheticWork {
    sr_steps: u32,
    open_steps: u32,
    sr_taken: u32,
    open_taken: u32,
}

impl SyntheticWork {
    /// Creates a synthetic unit with the given SR and OPEN lengths.
    pub fn new(sr_steps: u32, open_steps: u32) -> Self {
        Self {
            sr_steps,
            open_steps,
            sr_taken: 0,
            open_taken: 0,
        }
    }
}

impl Default for SyntheticWork {
    fn default() -> Self {
        Self::new(SMOKE_SR_STEPS, SMOKE_OPEN_STEPS)
    }
}

#[async_trait]
impl WorkUnit for SyntheticWork {
    async fn objective(&mut self, _domain: &Domain) -> std::result::Result<ObjectiveStep, StepFailure> {
        Ok(ObjectiveStep::Fulfilled)
    }

    async fn refine(&mut self, _domain: &Domain) -> std::result::Result<PhaseSignal, StepFailure> {
        self.sr_taken += 1;
        Ok(if self.sr_taken >= self.sr_steps {
            PhaseSignal::Finished
        } else {
            PhaseSignal::Continue
        })
    }

    async fn explore(&mut self, _domain: &Domain) -> std::result::Result<PhaseSignal, StepFailure> {
        self.open_taken += 1;
        Ok(if self.open_taken >= self.open_steps {
            PhaseSignal::Finished
        } else {
            PhaseSignal::Continue
        })
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// One-line summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    /// Domain the run improved.
    pub domain: Domain,
    /// Tier the run was admitted under.
    pub tier: Tier,
    /// Steps consumed.
    pub steps_taken: u32,
    /// Step cap in force.
    pub step_cap: u32,
    /// Objectives fulfilled.
    pub objectives_fulfilled: u32,
    /// Objective minimum in force.
    pub objective_min: u32,
    /// Terminal outcome.
    pub outcome: RunOutcome,
    /// The step cap forced the run terminal.
    pub capped: bool,
    /// The run entered OPEN.
    pub reached_open: bool,
    /// Work units that failed and were absorbed.
    pub failed_steps: u32,
}

impl From<&RunResult> for SummaryLine {
    fn from(result: &RunResult) -> Self {
        Self {
            domain: result.domain.clone(),
            tier: result.tier,
            steps_taken: result.steps_taken,
            step_cap: result.step_cap,
            objectives_fulfilled: result.objectives_fulfilled,
            objective_min: result.objective_min,
            outcome: result.outcome(),
            capped: result.capped,
            reached_open: result.reached_open,
            failed_steps: result.failed_steps,
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tier={} steps={}/{} obj={}/{} status={} open={} failed={}",
            self.domain,
            self.tier,
            self.steps_taken,
            self.step_cap,
            self.objectives_fulfilled,
            self.objective_min,
            self.outcome,
            self.reached_open,
            self.failed_steps
        )?;
        if self.outcome == RunOutcome::Completed && self.capped {
            write!(f, " capped=true")?;
        }
        Ok(())
    }
}

/// Results of a smoke run, in the order domains were given.
#[derive(Debug, Clone)]
pub struct SmokeReport {
    /// One result per domain.
    pub results: Vec<RunResult>,
}

impl SmokeReport {
    /// Returns one summary line per domain.
    pub fn summary_lines(&self) -> Vec<SummaryLine> {
        self.results.iter().map(SummaryLine::from).collect()
    }

    /// Returns true if any run did not complete.
    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|r| !r.completed)
    }

    /// Counts runs with the given outcome.
    pub fn count(&self, outcome: RunOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome() == outcome).count()
    }
}

impl fmt::Display for SmokeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.summary_lines() {
            writeln!(f, "{}", line)?;
        }
        write!(
            f,
            "runs={} completed={} capped={} cancelled={}",
            self.results.len(),
            self.count(RunOutcome::Completed),
            self.count(RunOutcome::Capped),
            self.count(RunOutcome::Cancelled)
        )
    }
}

/// Runs every domain concurrently at the given tier.
///
/// Every run is validated before any starts; an invalid run aborts the
/// whole smoke run with a configuration error.
pub async fn run_smoke(
    scheduler: RunScheduler,
    tier: Tier,
    domains: &[Domain],
    cancel: &CancelSignal,
) -> Result<SmokeReport> {
    let mut configs = Vec::with_capacity(domains.len());
    for domain in domains {
        let config = scheduler.admit(domain.clone(), tier);
        for warning in validate_run(scheduler.settings(), &config).into_result()? {
            tracing::debug!(run_id = %config.run_id(), "{}", warning);
        }
        configs.push(config);
    }

    let handles: Vec<_> = configs
        .into_iter()
        .map(|config| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut work = SyntheticWork::default();
                scheduler.run(config, &mut work, &cancel).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }

    Ok(SmokeReport { results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvSnapshot;
    use crate::scheduler::cancel_pair;
    use crate::settings::RolloutSettings;

    fn domains() -> Vec<Domain> {
        ["analytical", "mathematical", "verbal"]
            .into_iter()
            .map(Domain::from)
            .collect()
    }

    fn scheduler(pairs: &[(&str, &str)]) -> RunScheduler {
        let env = EnvSnapshot::from_pairs(pairs.iter().copied());
        RunScheduler::new(RolloutSettings::from_env(&env))
    }

    #[tokio::test]
    async fn long_smoke_completes_every_domain_through_open() {
        let report = run_smoke(scheduler(&[]), Tier::Long, &domains(), &CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(report.results.len(), 3);
        assert!(!report.has_warnings());
        for (result, domain) in report.results.iter().zip(domains()) {
            assert_eq!(result.domain, domain);
            assert!(result.reached_open);
            assert_eq!(result.steps_taken, 8 + SMOKE_SR_STEPS + SMOKE_OPEN_STEPS);
        }
    }

    #[tokio::test]
    async fn empty_domain_aborts_smoke_before_any_run() {
        let domains = vec![Domain::from("verbal"), Domain::from("")];
        let err = run_smoke(scheduler(&[]), Tier::Short, &domains, &CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(msg) if msg.contains("domain")));
    }

    #[tokio::test]
    async fn tiny_cap_smoke_reports_warnings() {
        let report = run_smoke(
            scheduler(&[("CAP_SHORT", "3")]),
            Tier::Short,
            &domains(),
            &CancelSignal::never(),
        )
        .await
        .unwrap();

        assert!(report.has_warnings());
        assert_eq!(report.count(RunOutcome::Capped), 3);
        let text = report.to_string();
        assert!(text.contains("verbal tier=short steps=3/3 obj=3/4 status=capped open=false"));
        assert!(text.ends_with("runs=3 completed=0 capped=3 cancelled=0"));
    }

    #[tokio::test]
    async fn cancelled_smoke_is_distinguishable_from_capped() {
        let (handle, signal) = cancel_pair();
        handle.cancel();
        let report = run_smoke(scheduler(&[]), Tier::Short, &domains(), &signal)
            .await
            .unwrap();

        assert!(report.has_warnings());
        assert_eq!(report.count(RunOutcome::Cancelled), 3);
        assert!(report
            .summary_lines()
            .iter()
            .all(|line| line.to_string().contains("status=cancelled")));
    }

    #[tokio::test]
    async fn summary_line_mirrors_result_fields() {
        let scheduler = scheduler(&[("CAP_SHORT", "5")]);
        let config = scheduler.admit("verbal", Tier::Short);
        let mut work = SyntheticWork::new(10, 0);
        let result = scheduler.run(config, &mut work, &CancelSignal::never()).await;

        let line = SummaryLine::from(&result);
        assert_eq!(line.steps_taken, result.steps_taken);
        assert_eq!(line.objectives_fulfilled, result.objectives_fulfilled);
        assert_eq!(line.outcome, RunOutcome::Completed);
        assert_eq!(
            line.to_string(),
            "verbal tier=short steps=5/5 obj=4/4 status=completed open=false failed=0 capped=true"
        );
    }
}
