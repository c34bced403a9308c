//! Type definitions for verification runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Lifecycle of a single verification run.
///
/// `NotStarted -> Running -> Finished`, with `Finished` terminal regardless of
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// `start` has not been called.
    NotStarted,

    /// Background task is computing.
    Running { started_at: DateTime<Utc> },

    /// Background task returned. `outcome` holds the mismatched unit names in
    /// report order, or the error that aborted the run.
    Finished {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        outcome: Result<Vec<String>>,
    },
}

impl RunState {
    /// Check if the run has begun (running or finished).
    pub fn is_started(&self) -> bool {
        !matches!(self, RunState::NotStarted)
    }

    /// Check if the background task has returned.
    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Finished { .. })
    }

    /// When the run began, if it has.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            RunState::NotStarted => None,
            RunState::Running { started_at } | RunState::Finished { started_at, .. } => {
                Some(*started_at)
            }
        }
    }

    /// When the run finished, if it has.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        match self {
            RunState::Finished { finished_at, .. } => Some(*finished_at),
            _ => None,
        }
    }
}

/// Serializable summary of a finished verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Unique run identifier.
    pub run_id: Uuid,

    /// Strategy that produced the report (e.g., "checksum_table").
    pub strategy: String,

    /// Units that were requested for verification.
    pub tables: Vec<String>,

    /// True only when the run succeeded and found no mismatches.
    pub consistent: bool,

    /// Units whose checksums disagreed, in target result order.
    pub mismatched_tables: Vec<String>,

    /// Error that aborted the run, if any.
    pub error: Option<String>,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl VerificationReport {
    /// Build a report from a run state. Returns `None` until the run finished.
    pub fn from_state(
        state: &RunState,
        run_id: Uuid,
        strategy: &str,
        tables: &[String],
    ) -> Option<Self> {
        let RunState::Finished {
            started_at,
            finished_at,
            outcome,
        } = state
        else {
            return None;
        };

        let (mismatched_tables, error) = match outcome {
            Ok(mismatches) => (mismatches.clone(), None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        Some(Self {
            run_id,
            strategy: strategy.to_string(),
            tables: tables.to_vec(),
            consistent: error.is_none() && mismatched_tables.is_empty(),
            mismatched_tables,
            error,
            started_at: *started_at,
            finished_at: *finished_at,
            duration_ms: (*finished_at - *started_at).num_milliseconds().max(0) as u64,
        })
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
