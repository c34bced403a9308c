//! Shared run state for background verification strategies.
//!
//! A [`RunHandle`] owns the `watch` channel through which the background task
//! publishes its single completion. Readers only ever observe whole
//! [`RunState`] values, so a result is never visible before `finished_at`.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use super::types::RunState;
use crate::error::{Result, VerifyError};

/// Cloneable handle to one run's state. The verifier keeps one clone and the
/// background task the other.
#[derive(Debug, Clone)]
pub struct RunHandle {
    tx: Arc<watch::Sender<RunState>>,
}

impl RunHandle {
    /// Create a handle in the `NotStarted` state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RunState::NotStarted);
        Self { tx: Arc::new(tx) }
    }

    /// Move `NotStarted -> Running`.
    ///
    /// Fails with [`VerifyError::AlreadyStarted`] if the run already began;
    /// the existing state is left untouched.
    pub fn begin(&self) -> Result<()> {
        let begun = self.tx.send_if_modified(|state| {
            if state.is_started() {
                return false;
            }
            *state = RunState::Running {
                started_at: Utc::now(),
            };
            true
        });

        if begun {
            Ok(())
        } else {
            Err(VerifyError::AlreadyStarted)
        }
    }

    /// Publish the run's outcome and wake every waiter.
    ///
    /// Only the first call has an effect.
    pub fn finish(&self, outcome: Result<Vec<String>>) {
        self.tx.send_if_modified(|state| {
            let started_at = match state {
                RunState::Finished { .. } => return false,
                RunState::Running { started_at } => *started_at,
                RunState::NotStarted => Utc::now(),
            };
            *state = RunState::Finished {
                started_at,
                finished_at: Utc::now(),
                outcome,
            };
            true
        });
    }

    /// Guard that publishes [`VerifyError::Aborted`] if it is dropped before
    /// [`FinishGuard::finish`] is called.
    ///
    /// Move it into the background task: a panic or a runtime shutdown drops
    /// the task's future, and the guard still completes the run.
    pub fn finish_guard(&self) -> FinishGuard {
        FinishGuard {
            run: Some(self.clone()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RunState {
        self.tx.borrow().clone()
    }

    pub fn has_started(&self) -> bool {
        self.tx.borrow().is_started()
    }

    pub fn has_finished(&self) -> bool {
        self.tx.borrow().is_finished()
    }

    /// The finished run's outcome, or [`VerifyError::NotFinished`].
    pub fn outcome(&self) -> Result<Vec<String>> {
        match &*self.tx.borrow() {
            RunState::Finished { outcome, .. } => outcome.clone(),
            _ => Err(VerifyError::NotFinished),
        }
    }

    /// Resolve once the run is finished. Returns immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(RunState::is_finished).await;
    }
}

impl Default for RunHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes a run exactly once, whether or not the task holding it finishes.
#[must_use = "dropping the guard aborts the run"]
#[derive(Debug)]
pub struct FinishGuard {
    run: Option<RunHandle>,
}

impl FinishGuard {
    /// Publish the run's outcome.
    pub fn finish(mut self, outcome: Result<Vec<String>>) {
        if let Some(run) = self.run.take() {
            run.finish(outcome);
        }
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.finish(Err(VerifyError::Aborted(
                "background task ended without an outcome (panicked or runtime shut down)"
                    .to_string(),
            )));
        }
    }
}
