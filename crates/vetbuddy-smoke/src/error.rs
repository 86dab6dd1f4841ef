//! Error types for the smoke harness.

use vetbuddy_client::ClientError;
use vetbuddy_core::CoreError;

/// Invalid harness configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base URL is not an http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Zero or absurd timeout.
    #[error("timeout must be between 1 and 600 seconds, got {0}")]
    InvalidTimeout(u64),

    /// Secrets file exists but cannot be used.
    #[error("secrets file {path}: {reason}")]
    Secrets {
        /// File that failed.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// HTTP client could not be built.
    #[error("client setup failed: {0}")]
    Client(#[from] ClientError),
}

/// Why a single check did not pass.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// An assertion did not hold.
    #[error("{0}")]
    Failed(String),

    /// A prerequisite is missing, so the check was not attempted.
    #[error("{0}")]
    Skipped(String),

    /// The request did not complete.
    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    /// A returned value could not be interpreted.
    #[error("unusable value: {0}")]
    Core(#[from] CoreError),
}

/// Fail the current check unless `cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::CheckError::Failed(format!($($arg)+)));
        }
    };
}

/// Fail the current check.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        return Err($crate::error::CheckError::Failed(format!($($arg)+)))
    };
}

/// Skip the current check.
#[macro_export]
macro_rules! skip {
    ($($arg:tt)+) => {
        return Err($crate::error::CheckError::Skipped(format!($($arg)+)))
    };
}
