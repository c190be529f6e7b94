//! Error types for vaultview.
//!
//! Path and transition errors are contract violations: the call fails
//! before anything is mutated. Store errors are operational and surface as
//! status notices while the session stays usable.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A directory path did not end with the `/` separator.
    #[error("invalid path '{0}': directory paths must end with '/'")]
    InvalidPath(String),

    /// State machine or navigator misuse (e.g. descending into a leaf).
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Transient store failure (network, auth, timeout).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The addressed directory or secret no longer exists.
    #[error("path '{0}' does not exist")]
    PathNotFound(String),

    /// Reserved for optimistic-concurrency checks on write; never produced yet.
    #[error("write conflict on '{path}': stored version {stored} is newer than {expected}")]
    WriteConflict {
        path: String,
        expected: u64,
        stored: u64,
    },

    /// The secret-tree file backing a store could not be parsed or written.
    #[error("invalid store file: {0}")]
    StoreFormat(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    /// Whether this is an expected operational condition rather than a bug.
    ///
    /// Operational errors are reported as timed notices; the session keeps going.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            Error::StoreUnavailable(_) | Error::PathNotFound(_) | Error::WriteConflict { .. }
        )
    }

    /// Whether the store reported the target as gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PathNotFound(_))
    }

    pub(crate) fn transition(msg: impl Into<String>) -> Self {
        Error::InvalidTransition(msg.into())
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("no secret store configured (use --store or VAULTVIEW_STORE)")]
    NoStore,

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
