//! Per-tier step caps and objective minima.
//!
//! Step caps may be overridden from the environment for staging speed.
//! Objective minima are fixed per tier and no configuration path reaches
//! them: operators may resize a run's budget but never lower the bar a run
//! must clear to be called complete.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env::EnvSnapshot;

/// Default step cap for SHORT runs.
pub const DEFAULT_CAP_SHORT: u32 = 104;

/// Default step cap for LONG runs.
pub const DEFAULT_CAP_LONG: u32 = 160;

/// Fixed objective minimum for SHORT runs.
pub const OBJ_MIN_SHORT: u32 = 4;

/// Fixed objective minimum for LONG runs.
pub const OBJ_MIN_LONG: u32 = 8;

/// Override variable for the SHORT step cap.
pub const CAP_SHORT: &str = "CAP_SHORT";

/// Override variable for the LONG step cap.
pub const CAP_LONG: &str = "CAP_LONG";

/// Every environment variable the registry consults.
pub const OVERRIDE_VARS: &[&str] = &[CAP_SHORT, CAP_LONG];

/// Run-length class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Short,
    Long,
}

impl Tier {
    /// Returns the lowercase name used in summaries and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Short => "short",
            Tier::Long => "long",
        }
    }

    /// Returns the fixed objective minimum for this tier.
    pub fn objective_min(&self) -> u32 {
        match self {
            Tier::Short => OBJ_MIN_SHORT,
            Tier::Long => OBJ_MIN_LONG,
        }
    }

    /// Returns the default step cap for this tier.
    pub fn default_cap(&self) -> u32 {
        match self {
            Tier::Short => DEFAULT_CAP_SHORT,
            Tier::Long => DEFAULT_CAP_LONG,
        }
    }

    /// Returns the environment variable that overrides this tier's cap.
    pub fn cap_var(&self) -> &'static str {
        match self {
            Tier::Short => CAP_SHORT,
            Tier::Long => CAP_LONG,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Tier::Short),
            "long" => Ok(Tier::Long),
            other => Err(format!("unknown tier '{}' (expected short or long)", other)),
        }
    }
}

/// Resolved step caps for both tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapRegistry {
    /// Step cap for SHORT runs.
    #[serde(default = "default_cap_short")]
    pub cap_short: u32,
    /// Step cap for LONG runs.
    #[serde(default = "default_cap_long")]
    pub cap_long: u32,
}

fn default_cap_short() -> u32 {
    DEFAULT_CAP_SHORT
}

fn default_cap_long() -> u32 {
    DEFAULT_CAP_LONG
}

impl Default for CapRegistry {
    fn default() -> Self {
        Self {
            cap_short: default_cap_short(),
            cap_long: default_cap_long(),
        }
    }
}

impl CapRegistry {
    /// Resolves caps from the environment, keeping defaults for unset or
    /// unusable overrides.
    pub fn from_env(env: &EnvSnapshot) -> Self {
        Self {
            cap_short: resolve_cap(env, Tier::Short),
            cap_long: resolve_cap(env, Tier::Long),
        }
    }

    /// Returns `(step_cap, objective_min)` for a tier.
    pub fn caps_for(&self, tier: Tier) -> (u32, u32) {
        let cap = match tier {
            Tier::Short => self.cap_short,
            Tier::Long => self.cap_long,
        };
        (cap, tier.objective_min())
    }
}

fn resolve_cap(env: &EnvSnapshot, tier: Tier) -> u32 {
    let default = tier.default_cap();
    let Some(raw) = env.get(tier.cap_var()) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(cap) if cap > 0 => cap,
        _ => {
            tracing::debug!(var = tier.cap_var(), value = raw, default, "ignoring step cap override");
            default
        }
    }
}
