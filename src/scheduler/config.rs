//! Per-run configuration and identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::caps::Tier;
use crate::settings::RolloutSettings;

/// Subject area a run improves. Opaque to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Creates a domain identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the domain name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Domain {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identifier assigned to a run when it is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable configuration for a single run.
///
/// The objective minimum always comes from the tier; only the step cap and
/// OPEN eligibility are configurable. A recorded `objective_min` is ignored
/// on deserialization and rebuilt from the tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RunConfigRecord")]
pub struct RunConfig {
    run_id: RunId,
    domain: Domain,
    tier: Tier,
    step_cap: u32,
    objective_min: u32,
    open_eligible: bool,
}

/// Deserialized form of [`RunConfig`]; has no objective minimum.
#[derive(Deserialize)]
struct RunConfigRecord {
    run_id: RunId,
    domain: Domain,
    tier: Tier,
    step_cap: u32,
    open_eligible: bool,
}

impl From<RunConfigRecord> for RunConfig {
    fn from(record: RunConfigRecord) -> Self {
        Self {
            run_id: record.run_id,
            domain: record.domain,
            tier: record.tier,
            step_cap: record.step_cap,
            objective_min: record.tier.objective_min(),
            open_eligible: record.open_eligible && record.tier == Tier::Long,
        }
    }
}

impl RunConfig {
    /// Creates a run configuration with the tier's default cap.
    ///
    /// OPEN eligibility defaults to true for LONG runs and false for SHORT runs.
    pub fn new(domain: impl Into<Domain>, tier: Tier) -> Self {
        Self {
            run_id: RunId::new(),
            domain: domain.into(),
            tier,
            step_cap: tier.default_cap(),
            objective_min: tier.objective_min(),
            open_eligible: tier == Tier::Long,
        }
    }

    /// Builds a run configuration from resolved settings.
    pub fn from_settings(domain: impl Into<Domain>, tier: Tier, settings: &RolloutSettings) -> Self {
        let (step_cap, _) = settings.caps.caps_for(tier);
        Self::new(domain, tier)
            .with_step_cap(step_cap)
            .with_open_eligible(settings.open_eligible(tier))
    }

    /// Sets the step cap.
    pub fn with_step_cap(mut self, step_cap: u32) -> Self {
        self.step_cap = step_cap;
        self
    }

    /// Sets OPEN eligibility. Ignored for SHORT runs, which never enter OPEN.
    pub fn with_open_eligible(mut self, open_eligible: bool) -> Self {
        self.open_eligible = open_eligible && self.tier == Tier::Long;
        self
    }

    /// Returns the run identifier.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Returns the tier.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Returns the step cap.
    pub fn step_cap(&self) -> u32 {
        self.step_cap
    }

    /// Returns the objective minimum.
    pub fn objective_min(&self) -> u32 {
        self.objective_min
    }

    /// Returns whether the run may enter OPEN.
    pub fn open_eligible(&self) -> bool {
        self.open_eligible
    }
}
