//! RunScheduler: the step loop that admits and drives runs.
//!
//! Each step runs exactly one work unit and is evaluated in this order:
//! objective fulfillment, then SR/OPEN termination, then the step cap.
//! Cancellation is observed before every step.

use crate::caps::Tier;
use crate::settings::RolloutSettings;

use super::cancel::CancelSignal;
use super::config::{Domain, RunConfig};
use super::result::RunResult;
use super::state::{Phase, RunState};
use super::work::{ObjectiveStep, PhaseSignal, WorkUnit};

/// How the loop left a phase.
#[derive(Debug, Clone, Copy, Default)]
struct Terminal {
    completed: bool,
    capped: bool,
    reached_open: bool,
}

/// Admits runs against a settings snapshot and drives them to completion.
///
/// Cheap to clone; clones share nothing mutable, so independent runs may
/// execute concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunScheduler {
    settings: RolloutSettings,
}

impl RunScheduler {
    /// Creates a scheduler over resolved settings.
    pub fn new(settings: RolloutSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings snapshot.
    pub fn settings(&self) -> &RolloutSettings {
        &self.settings
    }

    /// Builds the configuration for a new run.
    pub fn admit(&self, domain: impl Into<Domain>, tier: Tier) -> RunConfig {
        let config = RunConfig::from_settings(domain, tier, &self.settings);
        tracing::info!(
            run_id = %config.run_id(),
            domain = %config.domain(),
            tier = %tier,
            step_cap = config.step_cap(),
            objective_min = config.objective_min(),
            open_eligible = config.open_eligible(),
            "run admitted"
        );
        config
    }

    /// Drives a run until it completes, hits its cap, or is cancelled.
    pub async fn run<W>(&self, config: RunConfig, work: &mut W, cancel: &CancelSignal) -> RunResult
    where
        W: WorkUnit + ?Sized,
    {
        let mut state = RunState::new();
        let mut failed_steps = 0u32;
        let cap = config.step_cap();

        tracing::info!(
            run_id = %config.run_id(),
            domain = %config.domain(),
            work = work.name(),
            "run started"
        );

        let terminal = loop {
            if cancel.is_cancelled() {
                tracing::info!(
                    run_id = %config.run_id(),
                    domain = %config.domain(),
                    phase = %state.phase(),
                    steps_taken = state.steps_taken(),
                    "run cancelled"
                );
                break Terminal::default();
            }

            if state.steps_taken() >= cap {
                // Only reachable with a zero cap; every other exhaustion is
                // caught right after the step that used the last slot.
                break Terminal {
                    completed: false,
                    capped: true,
                    reached_open: false,
                };
            }

            state.record_step();
            let step = state.steps_taken();

            match state.phase() {
                Phase::Objective => {
                    match work.objective(config.domain()).await {
                        Ok(ObjectiveStep::Fulfilled) => state.record_objective(),
                        Ok(ObjectiveStep::Unfulfilled) => {}
                        Err(failure) => {
                            failed_steps += 1;
                            tracing::warn!(
                                run_id = %config.run_id(),
                                work = work.name(),
                                phase = %Phase::Objective,
                                step,
                                error = %failure,
                                "work unit failed"
                            );
                        }
                    }

                    if state.objectives_fulfilled() >= config.objective_min() {
                        if step >= cap {
                            break Terminal {
                                completed: true,
                                capped: false,
                                reached_open: false,
                            };
                        }
                        self.transition(&config, &mut state, Phase::Sr);
                    } else if step >= cap {
                        break Terminal {
                            completed: false,
                            capped: true,
                            reached_open: false,
                        };
                    }
                }
                Phase::Sr => {
                    let signal = match work.refine(config.domain()).await {
                        Ok(signal) => signal,
                        Err(failure) => {
                            failed_steps += 1;
                            tracing::warn!(
                                run_id = %config.run_id(),
                                work = work.name(),
                                phase = %Phase::Sr,
                                step,
                                error = %failure,
                                "work unit failed"
                            );
                            PhaseSignal::Continue
                        }
                    };

                    if step >= cap {
                        break Terminal {
                            completed: true,
                            capped: true,
                            reached_open: false,
                        };
                    }
                    if signal == PhaseSignal::Finished {
                        if !config.open_eligible() {
                            break Terminal {
                                completed: true,
                                capped: false,
                                reached_open: false,
                            };
                        }
                        self.transition(&config, &mut state, Phase::Open);
                    }
                }
                Phase::Open => {
                    let signal = match work.explore(config.domain()).await {
                        Ok(signal) => signal,
                        Err(failure) => {
                            failed_steps += 1;
                            tracing::warn!(
                                run_id = %config.run_id(),
                                work = work.name(),
                                phase = %Phase::Open,
                                step,
                                error = %failure,
                                "work unit failed"
                            );
                            PhaseSignal::Continue
                        }
                    };

                    if signal == PhaseSignal::Finished || step >= cap {
                        break Terminal {
                            completed: true,
                            capped: step >= cap,
                            reached_open: true,
                        };
                    }
                }
                Phase::Done => unreachable!("the loop exits when DONE is entered"),
            }
        };

        self.transition(&config, &mut state, Phase::Done);

        let result = RunResult {
            run_id: config.run_id(),
            domain: config.domain().clone(),
            tier: config.tier(),
            steps_taken: state.steps_taken(),
            step_cap: cap,
            objectives_fulfilled: state.objectives_fulfilled(),
            objective_min: config.objective_min(),
            completed: terminal.completed,
            capped: terminal.capped,
            reached_open: terminal.reached_open,
            failed_steps,
            phases: state.into_history(),
        };

        tracing::info!(
            run_id = %result.run_id,
            domain = %result.domain,
            outcome = %result.outcome(),
            steps_taken = result.steps_taken,
            step_cap = result.step_cap,
            objectives_fulfilled = result.objectives_fulfilled,
            failed_steps = result.failed_steps,
            "run finished"
        );

        result
    }

    fn transition(&self, config: &RunConfig, state: &mut RunState, next: Phase) {
        tracing::info!(
            run_id = %config.run_id(),
            domain = %config.domain(),
            tier = %config.tier(),
            from = %state.phase(),
            to = %next,
            steps_taken = state.steps_taken(),
            "phase transition"
        );
        state.enter(next);
    }
}
