//! Configuration validation for rollout runs.
//!
//! Validates settings and run configurations before scheduling to catch
//! budgets that can never produce a completed run.

use crate::caps::Tier;
use crate::error::{Error, Result};
use crate::scheduler::RunConfig;
use crate::settings::RolloutSettings;

/// Validation result containing all found issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (fatal).
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Merges another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Converts to a Result, failing if there are errors.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Trait for validatable configuration types.
pub trait Validate {
    /// Validates the configuration and returns any issues found.
    fn validate(&self) -> ValidationResult;
}

fn check_budget(result: &mut ValidationResult, tier: Tier, step_cap: u32, objective_min: u32) {
    if step_cap == 0 {
        result.add_error(format!("{} step cap must be at least 1", tier));
    } else if step_cap < objective_min {
        result.add_warning(format!(
            "{} step cap {} is below the objective minimum {}; runs can only end capped",
            tier, step_cap, objective_min
        ));
    }
}

impl Validate for RolloutSettings {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        for tier in [Tier::Short, Tier::Long] {
            let (step_cap, objective_min) = self.caps.caps_for(tier);
            check_budget(&mut result, tier, step_cap, objective_min);
        }

        if self.caps.cap_short > self.caps.cap_long {
            result.add_warning(format!(
                "short step cap {} exceeds long step cap {}",
                self.caps.cap_short, self.caps.cap_long
            ));
        }

        result
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.domain().as_str().trim().is_empty() {
            result.add_error("domain cannot be empty");
        }

        check_budget(&mut result, self.tier(), self.step_cap(), self.objective_min());

        result
    }
}

/// Validates settings together with the run about to be scheduled.
pub fn validate_run(settings: &RolloutSettings, config: &RunConfig) -> ValidationResult {
    let mut result = settings.validate();
    result.merge(config.validate());
    result
}
