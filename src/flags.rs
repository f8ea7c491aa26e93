//! Boolean feature flag resolution.
//!
//! Flags are resolved from an [`EnvSnapshot`] with conservative defaults.
//! A value that is not recognizably boolean falls back to the default;
//! flag resolution never aborts scheduling.

use serde::{Deserialize, Serialize};

use crate::env::EnvSnapshot;

/// Gates plan generation after a completed run.
pub const PLAN_ENABLED: &str = "PLAN_ENABLED";

/// Gates whether LONG-tier runs may enter the OPEN phase.
pub const OPEN_ENABLED_LONG: &str = "OPEN_ENABLED_LONG";

/// Toggles the concise per-domain summary output.
pub const STAGING_PROFILE: &str = "STAGING_PROFILE";

/// Parses a boolean spelling, returning `None` for anything unrecognized.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolves boolean flags against an environment snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FlagResolver<'a> {
    env: &'a EnvSnapshot,
}

impl<'a> FlagResolver<'a> {
    /// Creates a resolver over the given snapshot.
    pub fn new(env: &'a EnvSnapshot) -> Self {
        Self { env }
    }

    /// Looks up an override for `name`; returns `default` if absent or unparseable.
    pub fn resolve(&self, name: &str, default: bool) -> bool {
        match self.env.get(name) {
            None => default,
            Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                tracing::debug!(flag = name, value = raw, default, "unrecognized flag value");
                default
            }),
        }
    }

    /// Resolves every recognized flag into a typed snapshot.
    pub fn flags(&self) -> Flags {
        let defaults = Flags::default();
        Flags {
            plan_enabled: self.resolve(PLAN_ENABLED, defaults.plan_enabled),
            open_enabled_long: self.resolve(OPEN_ENABLED_LONG, defaults.open_enabled_long),
            staging_profile: self.resolve(STAGING_PROFILE, defaults.staging_profile),
        }
    }
}

/// Resolved feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Whether improvement plans may be generated.
    #[serde(default = "default_true")]
    pub plan_enabled: bool,
    /// Whether LONG-tier runs may enter the OPEN phase.
    #[serde(default = "default_true")]
    pub open_enabled_long: bool,
    /// Whether per-domain summaries are printed.
    #[serde(default)]
    pub staging_profile: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            plan_enabled: default_true(),
            open_enabled_long: default_true(),
            staging_profile: false,
        }
    }
}
