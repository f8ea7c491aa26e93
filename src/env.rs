//! Immutable environment snapshots.
//!
//! The process environment is read exactly once, at startup. Every resolver
//! in this crate is a pure function of an [`EnvSnapshot`], so tests build
//! snapshots explicitly instead of mutating the process environment.

use std::collections::HashMap;

/// A frozen view of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Builds a snapshot from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the raw value of a variable, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_exposes_values() {
        let env = EnvSnapshot::from_pairs([("CAP_SHORT", "12"), ("PLAN_ENABLED", "0")]);
        assert_eq!(env.get("CAP_SHORT"), Some("12"));
        assert_eq!(env.get("PLAN_ENABLED"), Some("0"));
        assert_eq!(env.get("CAP_LONG"), None);
    }

    #[test]
    fn default_snapshot_has_no_values() {
        assert_eq!(EnvSnapshot::default().get("PLAN_ENABLED"), None);
    }

    #[test]
    fn later_pairs_win_for_duplicate_names() {
        let env = EnvSnapshot::from_pairs([("PLAN_ENABLED", "1"), ("PLAN_ENABLED", "0")]);
        assert_eq!(env.get("PLAN_ENABLED"), Some("0"));
    }
}
