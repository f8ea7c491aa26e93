//! Immutable rollout settings.
//!
//! Environment reads are collapsed into a [`RolloutSettings`] once, at
//! process start, and passed explicitly to the scheduler. The snapshot can
//! be written out and replayed so a run is reproducible from its recorded
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::caps::{CapRegistry, Tier};
use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::flags::{FlagResolver, Flags};

/// Flags and caps resolved for a process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutSettings {
    /// Feature flags.
    #[serde(default)]
    pub flags: Flags,
    /// Per-tier step caps.
    #[serde(default)]
    pub caps: CapRegistry,
}

impl RolloutSettings {
    /// Resolves settings from an environment snapshot.
    pub fn from_env(env: &EnvSnapshot) -> Self {
        Self {
            flags: FlagResolver::new(env).flags(),
            caps: CapRegistry::from_env(env),
        }
    }

    /// Parses a recorded snapshot.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a recorded snapshot from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serializes the snapshot for recording.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Writes the snapshot to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Returns true if runs of this tier may enter the OPEN phase.
    pub fn open_eligible(&self, tier: Tier) -> bool {
        tier == Tier::Long && self.flags.open_enabled_long
    }
}
