//! Background verification of source/target consistency.
//!
//! A [`Verifier`] is started once, computes in a background Tokio task, and
//! publishes a single result that any number of callers can wait on:
//!
//! - [`ChecksumTableVerifier`]: compares whole-table `CHECKSUM TABLE` values
//!
//! # Design Pattern
//!
//! This uses the Strategy pattern so the orchestrator can hold a
//! `Box<dyn Verifier>` without knowing which comparison technique runs.

pub mod checksum;
pub mod query;
pub mod run;
pub mod types;

// Re-exports
pub use checksum::ChecksumTableVerifier;
pub use run::{FinishGuard, RunHandle};
pub use types::{RunState, VerificationReport};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::store::Store;

/// Stores a verification run reads from.
///
/// Both handles stay owned by the orchestrator; the run holds a clone of each
/// `Arc` only until its queries complete.
#[derive(Clone)]
pub struct VerifyContext {
    pub source: Arc<dyn Store>,
    pub target: Arc<dyn Store>,
}

impl VerifyContext {
    pub fn new(source: Arc<dyn Store>, target: Arc<dyn Store>) -> Self {
        Self { source, target }
    }
}

/// A pluggable way to check that source and target hold the same data.
///
/// # Example
///
/// ```rust,ignore
/// let verifier: Box<dyn Verifier> = Box::new(ChecksumTableVerifier::new(tables));
/// verifier.start(VerifyContext::new(source, target))?;
/// verifier.wait().await;
/// if verifier.verdict()? {
///     println!("consistent");
/// }
/// ```
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Short strategy identifier for logs and reports.
    fn name(&self) -> &'static str;

    /// Begin the run in the background and return immediately.
    ///
    /// Must be called from within a Tokio runtime. A second call fails with
    /// `AlreadyStarted` and leaves the first run alone.
    fn start(&self, ctx: VerifyContext) -> Result<()>;

    /// True once `start` succeeded.
    fn has_started(&self) -> bool;

    /// True once the background task has returned, successfully or not.
    fn has_finished(&self) -> bool;

    /// Names of the units that disagree, or the error that aborted the run.
    ///
    /// Fails with `NotFinished` until the run completes.
    fn mismatches(&self) -> Result<Vec<String>>;

    /// `Ok(true)` when the run succeeded and nothing disagreed.
    ///
    /// Always check the error: an aborted run has no mismatches but is not
    /// consistent.
    fn verdict(&self) -> Result<bool> {
        self.mismatches().map(|m| m.is_empty())
    }

    /// Resolve once the run has finished.
    async fn wait(&self);

    /// Block the calling thread until the run has finished.
    ///
    /// Intended for threads outside the runtime; inside async code use
    /// [`Verifier::wait`].
    fn wait_blocking(&self) {
        futures::executor::block_on(self.wait())
    }

    /// Summary of the finished run, `None` while it is still going.
    fn report(&self) -> Option<VerificationReport>;
}
