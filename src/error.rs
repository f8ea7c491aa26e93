//! Error types for the adaptive-rollout scheduler.

use thiserror::Error;

use crate::scheduler::RunId;

/// Top-level error type.
///
/// Only configuration problems abort a run or process. Anomalies inside a
/// run degrade to "no progress this step" and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing external configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A recorded settings snapshot could not be parsed.
    #[error("invalid settings file: {0}")]
    Settings(#[from] toml::de::Error),

    /// A settings snapshot could not be serialized.
    #[error("failed to serialize settings: {0}")]
    SettingsEncode(#[from] toml::ser::Error),

    /// No finished run is known under this identifier.
    #[error("run not found: {0}")]
    RunNotFound(RunId),

    /// A concurrently executing run panicked or was aborted.
    #[error("run task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// IO error while reading or writing settings.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rollout operations.
pub type Result<T> = std::result::Result<T, Error>;
