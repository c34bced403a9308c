//! Whole-table checksum verification.
//!
//! Issues one `CHECKSUM TABLE ... EXTENDED` per store and compares the
//! per-table values. The comparison is driven by the target's result set:
//!
//! - a table the target reports but the source does not is compared against
//!   a source checksum of zero
//! - a table the source reports but the target does not is never inspected
//!
//! Both follow from looking up each target row in the source map.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use super::query::checksum_table_query;
use super::run::RunHandle;
use super::types::VerificationReport;
use super::{Verifier, VerifyContext};
use crate::error::{Result, VerifyError};
use crate::store::Store;

/// Checksum of one table as reported by one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableChecksum {
    pub table: String,
    pub checksum: i64,
}

/// Verifier comparing `CHECKSUM TABLE` results between source and target.
pub struct ChecksumTableVerifier {
    tables: Vec<String>,
    run_id: Uuid,
    span: Span,
    run: RunHandle,
}

impl ChecksumTableVerifier {
    /// Create a verifier for the given tables (`db.table` or bare names).
    pub fn new(tables: Vec<String>) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!("checksum_verifier", run_id = %run_id);
        Self {
            tables,
            run_id,
            span,
            run: RunHandle::new(),
        }
    }

    /// Log through `span` instead of the default `checksum_verifier` span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.run.state().started_at()
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.run.state().finished_at()
    }
}

#[async_trait]
impl Verifier for ChecksumTableVerifier {
    fn name(&self) -> &'static str {
        "checksum_table"
    }

    fn start(&self, ctx: VerifyContext) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| VerifyError::NoRuntime(e.to_string()))?;

        self.run.begin()?;

        let guard = self.run.finish_guard();
        let tables = self.tables.clone();
        let span = self.span.clone();

        span.in_scope(|| info!("Starting checksum verification of {} tables", tables.len()));

        runtime.spawn(
            async move {
                let outcome =
                    verify_checksums(&tables, ctx.source.as_ref(), ctx.target.as_ref()).await;
                match &outcome {
                    Ok(mismatches) if mismatches.is_empty() => {
                        info!("All {} tables verified", tables.len())
                    }
                    Ok(mismatches) => warn!(
                        "{} of {} tables mismatched: {:?}",
                        mismatches.len(),
                        tables.len(),
                        mismatches
                    ),
                    Err(e) => error!(error = %e, "Checksum verification aborted"),
                }
                guard.finish(outcome);
            }
            .instrument(span),
        );

        Ok(())
    }

    fn has_started(&self) -> bool {
        self.run.has_started()
    }

    fn has_finished(&self) -> bool {
        self.run.has_finished()
    }

    fn mismatches(&self) -> Result<Vec<String>> {
        self.run.outcome()
    }

    async fn wait(&self) {
        self.run.wait().await
    }

    fn report(&self) -> Option<VerificationReport> {
        VerificationReport::from_state(&self.run.state(), self.run_id, self.name(), &self.tables)
    }
}

/// Checksum every table on both stores and return the mismatched names in
/// target result order.
async fn verify_checksums(
    tables: &[String],
    source: &dyn Store,
    target: &dyn Store,
) -> Result<Vec<String>> {
    if tables.is_empty() {
        warn!("No tables configured, nothing to verify");
        return Ok(Vec::new());
    }

    let query = checksum_table_query(tables);

    let source_checksums: HashMap<String, i64> = fetch_checksums(source, &query)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to checksum source tables"))?
        .into_iter()
        .map(|c| (c.table, c.checksum))
        .collect();

    let target_checksums = fetch_checksums(target, &query)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to checksum target tables"))?;

    Ok(compare_checksums(&source_checksums, &target_checksums))
}

/// Run the checksum statement on one store and decode `(Table, Checksum)` rows.
pub async fn fetch_checksums(store: &dyn Store, query: &str) -> Result<Vec<TableChecksum>> {
    let rows = store.query(query).await?;
    rows.iter()
        .map(|row| {
            Ok(TableChecksum {
                table: row.get_string(0)?,
                checksum: row.get_i64(1)?,
            })
        })
        .collect()
}

/// Compare target checksums against the source map.
///
/// Iterates the target rows in order; a table missing from `source` compares
/// as zero. Tables only present in `source` are not reported.
pub fn compare_checksums(
    source: &HashMap<String, i64>,
    target: &[TableChecksum],
) -> Vec<String> {
    let mut mismatches = Vec::new();

    for entry in target {
        let source_checksum = source.get(&entry.table).copied().unwrap_or_default();
        debug!(
            table = %entry.table,
            "source table checksum: {} | target table checksum: {}",
            source_checksum,
            entry.checksum
        );
        if entry.checksum != source_checksum {
            warn!(table = %entry.table, "Table verification failed");
            mismatches.push(entry.table.clone());
        }
    }

    mismatches
}
