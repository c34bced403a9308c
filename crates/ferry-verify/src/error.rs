//! Error types for the verification library.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of the migration a store sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreRole {
    Source,
    Target,
}

impl fmt::Display for StoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreRole::Source => write!(f, "source"),
            StoreRole::Target => write!(f, "target"),
        }
    }
}

/// Main error type for verification operations.
///
/// Run errors are stored inside the verifier and handed out to every reader,
/// so all variants carry owned strings and the type is `Clone`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Store unreachable, malformed statement, or database-side failure
    #[error("{store} query failed: {message}")]
    Query { store: StoreRole, message: String },

    /// Result row did not have the expected column shape or types
    #[error("{store} row decode failed: {message}")]
    RowDecode { store: StoreRole, message: String },

    /// Verdict or mismatch list read before the run finished
    #[error("Verification has not finished")]
    NotFinished,

    /// `start` called on a verifier that already ran
    #[error("Verification already started; construct a new verifier for another run")]
    AlreadyStarted,

    /// `start` called outside a Tokio runtime
    #[error("No Tokio runtime to run verification on: {0}")]
    NoRuntime(String),

    /// Background run ended without producing an outcome (panic or runtime shutdown)
    #[error("Verification aborted: {0}")]
    Aborted(String),

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(String),

    /// Caller gave up waiting after the given number of seconds
    #[error("Verification did not finish within {0}s")]
    Timeout(u64),

    /// Caller abandoned the wait (SIGINT, etc.)
    #[error("Verification cancelled")]
    Cancelled,
}

impl VerifyError {
    /// Create a Query error from any displayable driver error.
    pub fn query(store: StoreRole, err: impl fmt::Display) -> Self {
        VerifyError::Query {
            store,
            message: err.to_string(),
        }
    }

    /// Create a RowDecode error.
    pub fn row_decode(store: StoreRole, message: impl Into<String>) -> Self {
        VerifyError::RowDecode {
            store,
            message: message.into(),
        }
    }

    /// The store that produced this error, if it came from one.
    pub fn store(&self) -> Option<StoreRole> {
        match self {
            VerifyError::Query { store, .. } | VerifyError::RowDecode { store, .. } => Some(*store),
            _ => None,
        }
    }

    /// Process exit code for this error class.
    ///
    /// 2 is reserved for "verification ran and found mismatches".
    pub fn exit_code(&self) -> u8 {
        match self {
            VerifyError::Config(_) => 1,
            VerifyError::Query { .. } => 3,
            VerifyError::RowDecode { .. } => 4,
            VerifyError::Timeout(_) => 5,
            VerifyError::Cancelled => 6,
            VerifyError::Io(_) => 7,
            VerifyError::NotFinished
            | VerifyError::AlreadyStarted
            | VerifyError::NoRuntime(_)
            | VerifyError::Aborted(_) => 8,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

impl From<std::io::Error> for VerifyError {
    fn from(err: std::io::Error) -> Self {
        VerifyError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for VerifyError {
    fn from(err: serde_yaml::Error) -> Self {
        VerifyError::Config(format!("invalid YAML: {}", err))
    }
}

impl From<serde_json::Error> for VerifyError {
    fn from(err: serde_json::Error) -> Self {
        VerifyError::Config(format!("JSON error: {}", err))
    }
}

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;
